use crate::domain::LaunchParams;
use crate::infra::E2eConfig;
use anyhow::{Context, Result, bail};
use clap::Args;
use std::collections::BTreeMap;

#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Node id from the config (default: every node)
    pub node: Option<String>,
    /// Image to launch instead of the one in the config
    #[arg(long)]
    pub image: Option<String>,
}

pub fn run(cmd: &RenderCommand, config: &E2eConfig) -> Result<()> {
    let output = render(config, cmd.node.as_deref(), cmd.image.as_deref())?;
    print!("{output}");
    Ok(())
}

/// Launch parameters of the selected nodes as YAML, keyed by node id
pub fn render(config: &E2eConfig, node: Option<&str>, image: Option<&str>) -> Result<String> {
    let image = image.unwrap_or(&config.image);

    let params: BTreeMap<&str, LaunchParams> = match node {
        Some(id) => {
            let Some(launch) = config.node(id) else {
                bail!("Nó '{id}' não existe na configuração");
            };
            BTreeMap::from([(id, launch.to_launch_params(image))])
        }
        None => config
            .nodes
            .iter()
            .map(|(id, launch)| (id.as_str(), launch.to_launch_params(image)))
            .collect(),
    };

    serde_yml::to_string(&params).context("serializando parâmetros de launch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LaunchConfig;

    fn config() -> E2eConfig {
        let mut config = E2eConfig::default();
        config
            .nodes
            .insert("leader".into(), LaunchConfig::default().name("qdrant-leader"));
        config.nodes.insert(
            "host".into(),
            LaunchConfig::default().name("qdrant-host").network_mode("host"),
        );
        config
    }

    #[test]
    fn renders_single_node() {
        let yaml = render(&config(), Some("leader"), None).unwrap();
        assert!(yaml.contains("leader:"));
        assert!(yaml.contains("qdrant/qdrant:latest"));
        assert!(yaml.contains("6333/tcp"));
        assert!(!yaml.contains("qdrant-host"));
    }

    #[test]
    fn renders_all_nodes_with_image_override() {
        let yaml = render(&config(), None, Some("qdrant/qdrant:dev")).unwrap();
        assert!(yaml.contains("qdrant-leader"));
        assert!(yaml.contains("qdrant-host"));
        assert!(yaml.contains("qdrant/qdrant:dev"));
        assert!(!yaml.contains("qdrant/qdrant:latest"));
    }

    #[test]
    fn unknown_node_is_an_error() {
        let err = render(&config(), Some("nope"), None).unwrap_err();
        assert!(err.to_string().contains("'nope'"));
    }
}
