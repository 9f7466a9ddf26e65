use crate::domain::launch::{GRPC_PORT, HTTP_PORT};
use crate::domain::{ClusterHandle, ContainerHandle, ContainerRuntime, LaunchConfig};
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::{debug, info};

const HOST_HTTP_PORT: u16 = 6333;
const HOST_GRPC_PORT: u16 = 6334;

/// Launches Qdrant nodes through a container runtime and wraps the result
/// into handles. No readiness checks, no retries.
pub struct NodeLauncher<R: ContainerRuntime> {
    runtime: Arc<R>,
    image: String,
    host: String,
}

impl<R: ContainerRuntime> NodeLauncher<R> {
    pub fn new(runtime: Arc<R>, image: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            runtime,
            image: image.into(),
            host: host.into(),
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Runs one node and returns its handle
    pub fn launch(&self, config: &LaunchConfig) -> Result<ContainerHandle<R::Container>> {
        let name = config
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .context("LaunchConfig sem 'name': o handle precisa de um nome")?;

        let params = config.to_launch_params(&self.image);
        info!(" Iniciando {name} ({})...", self.image);
        debug!(?params, "parâmetros de launch");

        let container = self
            .runtime
            .run_container(&params)
            .with_context(|| format!("iniciando container {name}"))?;

        let (http_port, grpc_port) = if config.uses_host_network() {
            (HOST_HTTP_PORT, Some(HOST_GRPC_PORT))
        } else {
            let http_port = self
                .runtime
                .host_port(&container, HTTP_PORT)
                .with_context(|| format!("consultando porta {HTTP_PORT} de {name}"))?
                .with_context(|| format!("{name} não publicou a porta {HTTP_PORT}"))?;
            let grpc_port = self
                .runtime
                .host_port(&container, GRPC_PORT)
                .with_context(|| format!("consultando porta {GRPC_PORT} de {name}"))?;
            (http_port, grpc_port)
        };

        let mut handle = ContainerHandle::new(container, &self.host, name, http_port, grpc_port);
        if let Some(project) = config.compose_project() {
            handle = handle.with_compose_project(project);
        }

        info!(" {handle}");
        Ok(handle)
    }

    /// Creates `network_name`, then runs the leader and each follower on it, in order.
    ///
    /// Nodes on host networking stay off the network. A config naming another
    /// network is rejected before anything is created.
    pub fn launch_cluster(
        &self,
        network_name: &str,
        leader: &LaunchConfig,
        followers: &[LaunchConfig],
    ) -> Result<ClusterHandle<R::Container, R::Network>> {
        let leader = on_network(leader, network_name)?;
        let followers = followers
            .iter()
            .map(|config| on_network(config, network_name))
            .collect::<Result<Vec<_>>>()?;

        let network = self
            .runtime
            .create_network(network_name)
            .with_context(|| format!("criando rede {network_name}"))?;

        let leader = self.launch(&leader)?;

        let followers = followers
            .iter()
            .map(|config| self.launch(config))
            .collect::<Result<Vec<_>>>()?;

        let cluster = ClusterHandle::new(leader, followers, network, network_name);
        info!(" {cluster}");
        Ok(cluster)
    }
}

fn on_network(config: &LaunchConfig, network_name: &str) -> Result<LaunchConfig> {
    let mut config = config.clone();
    if config.uses_host_network() {
        return Ok(config);
    }

    match config.network.as_deref().filter(|n| !n.is_empty()) {
        None => config.network = Some(network_name.to_string()),
        Some(network) if network == network_name => {}
        Some(network) => bail!(
            "{} está na rede '{}', mas o cluster usa '{}'",
            config.name.as_deref().unwrap_or("?"),
            network,
            network_name
        ),
    }
    Ok(config)
}
