use crate::domain::LaunchConfig;
use crate::infra::E2eConfig;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct NodesCommand {}

pub fn run(_cmd: &NodesCommand, config: &E2eConfig) -> Result<()> {
    if config.nodes.is_empty() {
        println!("Nenhum nó configurado");
        return Ok(());
    }

    println!("Imagem: {}", config.image);
    for line in summarize(config) {
        println!("{line}");
    }
    Ok(())
}

/// One line per node: id, container name, network and port publishing
pub fn summarize(config: &E2eConfig) -> Vec<String> {
    config
        .nodes
        .iter()
        .map(|(id, node)| {
            format!(
                "{id}: name={} network={} ports={}",
                node.name.as_deref().unwrap_or("-"),
                network_label(node),
                if node.uses_host_network() {
                    "host"
                } else {
                    "loopback"
                }
            )
        })
        .collect()
}

fn network_label(node: &LaunchConfig) -> &str {
    node.network
        .as_deref()
        .or(node.network_mode.as_deref())
        .unwrap_or("default")
}
