use super::ContainerHandle;
use std::fmt;

/// A leader node plus its followers, all attached to one runtime network.
///
/// Nodes are stored once, leader first, so `all_nodes()` is always
/// `[leader, followers..]`.
#[derive(Debug, Clone)]
pub struct ClusterHandle<C, N> {
    nodes: Vec<ContainerHandle<C>>,
    network: N,
    network_name: String,
}

impl<C, N> ClusterHandle<C, N> {
    pub fn new(
        leader: ContainerHandle<C>,
        followers: Vec<ContainerHandle<C>>,
        network: N,
        network_name: impl Into<String>,
    ) -> Self {
        let mut nodes = Vec::with_capacity(followers.len() + 1);
        nodes.push(leader);
        nodes.extend(followers);

        Self {
            nodes,
            network,
            network_name: network_name.into(),
        }
    }

    pub fn leader(&self) -> &ContainerHandle<C> {
        &self.nodes[0]
    }

    pub fn followers(&self) -> &[ContainerHandle<C>] {
        &self.nodes[1..]
    }

    pub fn all_nodes(&self) -> &[ContainerHandle<C>] {
        &self.nodes
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    /// Number of nodes, leader included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A cluster always has its leader
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Finds a node by container name
    pub fn node(&self, name: &str) -> Option<&ContainerHandle<C>> {
        self.nodes.iter().find(|node| node.name() == name)
    }
}

impl<C, N> fmt::Display for ClusterHandle<C, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClusterHandle(leader={}, followers={}, network='{}')",
            self.leader().name(),
            self.followers().len(),
            self.network_name
        )
    }
}
