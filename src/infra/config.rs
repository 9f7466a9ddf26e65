use crate::domain::LaunchConfig;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "qdrant-e2e.toml";
pub const DEFAULT_IMAGE: &str = "qdrant/qdrant:latest";
pub const DEFAULT_HOST: &str = "127.0.0.1";

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// Contents of a `qdrant-e2e.toml` file
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct E2eConfig {
    #[serde(default = "default_image")]
    pub image: String,
    /// Address the nodes are reachable on from the test process
    #[serde(default = "default_host")]
    pub host: String,
    /// Launch configs keyed by node id, as `[nodes.ID]`
    #[serde(default)]
    pub nodes: BTreeMap<String, LaunchConfig>,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            host: default_host(),
            nodes: BTreeMap::new(),
        }
    }
}

impl E2eConfig {
    pub fn node(&self, id: &str) -> Option<&LaunchConfig> {
        self.nodes.get(id)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

pub fn load_config(path: &Path) -> Result<E2eConfig> {
    if !path.exists() {
        bail!("Arquivo de configuração {:?} não encontrado", path);
    }

    let content = fs::read_to_string(path).with_context(|| format!("lendo {:?}", path))?;
    parse_config(&content, path)
}

pub fn parse_config(content: &str, path: &Path) -> Result<E2eConfig> {
    if content.trim().is_empty() {
        return Ok(E2eConfig::default());
    }

    let mut config: E2eConfig =
        toml::from_str(content).with_context(|| format!("parse de {:?}", path))?;

    if config.image.trim().is_empty() {
        bail!("{:?}: 'image' não pode ser vazio", path);
    }

    let mut names = HashSet::new();
    for (id, node) in &config.nodes {
        let Some(name) = node.name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        if !names.insert(name) {
            bail!("Nó '{}' em {:?} duplicou o nome '{}'", id, path, name);
        }
    }

    for node in config.nodes.values_mut() {
        expand_volume_paths(node);
    }

    debug!("{} nó(s) carregado(s) de {:?}", config.nodes.len(), path);
    Ok(config)
}

fn expand_volume_paths(node: &mut LaunchConfig) {
    node.volumes = std::mem::take(&mut node.volumes)
        .into_iter()
        .map(|(host_path, bind)| (shellexpand::tilde(&host_path).into_owned(), bind))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Command, ParamValue};

    #[test]
    fn parses_nodes() {
        let toml = r#"
image = "qdrant/qdrant:v1.12.1"

[nodes.leader]
name = "qdrant-leader"
mem_limit = "1g"
environment = { QDRANT__CLUSTER__ENABLED = "true" }
command = ["./qdrant", "--uri", "http://qdrant-leader:6335"]

[nodes.follower]
name = "qdrant-follower"
command = "./qdrant --bootstrap http://qdrant-leader:6335"
remove = false
"#;

        let config = parse_config(toml, Path::new("qdrant-e2e.toml")).unwrap();
        assert_eq!(config.image, "qdrant/qdrant:v1.12.1");
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.nodes.len(), 2);

        let leader = config.node("leader").unwrap();
        assert_eq!(leader.mem_limit.as_deref(), Some("1g"));
        assert_eq!(leader.environment["QDRANT__CLUSTER__ENABLED"], "true");
        assert!(matches!(leader.command, Some(Command::Exec(ref args)) if args.len() == 3));
        assert!(leader.remove);

        let follower = config.node("follower").unwrap();
        assert!(matches!(follower.command, Some(Command::Shell(_))));
        assert!(!follower.remove);
        assert!(follower.detach);
    }

    #[test]
    fn parses_volumes_and_additional_params() {
        let toml = r#"
[nodes.n1.volumes."/tmp/storage"]
bind = "/qdrant/storage"

[nodes.n1.additional_params]
remove = false
shm_size = "1g"
cpus = 1.5
pids_limit = 128
labels = { "com.docker.compose.project" = "e2e" }
"#;

        let config = parse_config(toml, Path::new("qdrant-e2e.toml")).unwrap();
        assert_eq!(config.image, DEFAULT_IMAGE);

        let node = config.node("n1").unwrap();
        assert_eq!(node.volumes["/tmp/storage"].bind, "/qdrant/storage");
        assert_eq!(node.volumes["/tmp/storage"].mode, "rw");
        assert_eq!(node.additional_params["remove"], ParamValue::Bool(false));
        assert_eq!(node.additional_params["cpus"], ParamValue::Float(1.5));
        assert_eq!(node.additional_params["pids_limit"], ParamValue::Int(128));
        assert_eq!(node.compose_project(), Some("e2e"));
    }

    #[test]
    fn expands_tilde_in_volume_paths() {
        let toml = r#"
[nodes.n1.volumes."~/qdrant-storage"]
bind = "/qdrant/storage"
mode = "ro"
"#;

        let config = parse_config(toml, Path::new("qdrant-e2e.toml")).unwrap();
        let node = config.node("n1").unwrap();
        let (host_path, bind) = node.volumes.iter().next().unwrap();
        assert!(!host_path.starts_with('~'));
        assert!(host_path.ends_with("qdrant-storage"));
        assert_eq!(bind.mode, "ro");
    }

    #[test]
    fn rejects_duplicate_names() {
        let toml = r#"
[nodes.a]
name = "qdrant-0"

[nodes.b]
name = "qdrant-0"
"#;

        let err = parse_config(toml, Path::new("qdrant-e2e.toml")).unwrap_err();
        assert!(err.to_string().contains("duplicou o nome"));
    }

    #[test]
    fn rejects_empty_image() {
        let err = parse_config("image = \" \"", Path::new("qdrant-e2e.toml")).unwrap_err();
        assert!(err.to_string().contains("'image'"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let toml = r#"
[nodes.a]
memory = "1g"
"#;

        assert!(parse_config(toml, Path::new("qdrant-e2e.toml")).is_err());
    }

    #[test]
    fn empty_file_is_allowed() {
        let config = parse_config("   \n", Path::new("qdrant-e2e.toml")).unwrap();
        assert_eq!(config, E2eConfig::default());
    }

    #[test]
    fn load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("não encontrado"));
    }
}
