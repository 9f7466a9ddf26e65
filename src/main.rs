use anyhow::Result;
use clap::{Parser, Subcommand};
use qdrant_e2e::cli::{NodesCommand, RenderCommand, nodes, render};
use qdrant_e2e::infra::config::{default_config_path, load_config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "qdrant-e2e",
    about = "Launch parameters for Qdrant e2e test containers"
)]
struct Cli {
    /// Arquivo de configuração (default: ./qdrant-e2e.toml)
    #[arg(long, env = "QDRANT_E2E_CONFIG", default_value_os_t = default_config_path())]
    config: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mostra os parâmetros de launch de um nó (ou de todos) em YAML
    Render(RenderCommand),
    /// Lista os nós configurados
    Nodes(NodesCommand),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qdrant_e2e=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Render(cmd) => render::run(&cmd, &config),
        Commands::Nodes(cmd) => nodes::run(&cmd, &config),
    }
}
