use super::LaunchParams;
use anyhow::Result;
use std::fmt::Debug;

/// Client side of the container runtime (docker, podman, ...).
///
/// Implementations own the daemon connection; this crate only hands them
/// launch parameters and wraps what they return.
pub trait ContainerRuntime: Send + Sync + Debug {
    /// Runtime's handle to a started container
    type Container: Clone + Debug;
    /// Runtime's handle to a network
    type Network: Debug;

    /// Run a container with the given parameters
    fn run_container(&self, params: &LaunchParams) -> Result<Self::Container>;

    /// Host port the runtime published `container_port` (e.g. "6333/tcp") on
    fn host_port(&self, container: &Self::Container, container_port: &str) -> Result<Option<u16>>;

    /// Create a network for the nodes of a cluster
    fn create_network(&self, name: &str) -> Result<Self::Network>;
}
