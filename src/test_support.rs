use crate::domain::{ContainerRuntime, LaunchParams, ParamValue};
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::sync::RwLock;

/// First host port handed out for unassigned bindings
pub const FIRST_EPHEMERAL_PORT: u16 = 32768;

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct MockContainer {
    pub id: String,
    pub params: LaunchParams,
    pub ports: HashMap<String, u16>,
}

/// In-memory runtime that records what it was asked to do.
#[derive(Debug)]
pub struct MockRuntime {
    containers: RwLock<HashMap<String, MockContainer>>,
    networks: RwLock<Vec<String>>,
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
    next_port: RwLock<u16>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            networks: RwLock::new(Vec::new()),
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
            next_port: RwLock::new(FIRST_EPHEMERAL_PORT),
        }
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    pub fn networks(&self) -> Vec<String> {
        self.networks.read().unwrap().clone()
    }

    pub fn params_for(&self, id: &str) -> Option<LaunchParams> {
        self.containers
            .read()
            .unwrap()
            .get(id)
            .map(|c| c.params.clone())
    }

    #[allow(dead_code)]
    pub fn container_count(&self) -> usize {
        self.containers.read().unwrap().len()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }

    fn publish_ports(&self, params: &LaunchParams) -> HashMap<String, u16> {
        let Some(bindings) = params.get("ports").and_then(ParamValue::as_map) else {
            return HashMap::new();
        };

        let mut next_port = self.next_port.write().unwrap();
        let mut published = HashMap::new();

        for (container_port, binding) in bindings {
            let host_port = match binding.as_binding().and_then(|b| b.host_port) {
                Some(port) => port,
                None => {
                    let port = *next_port;
                    *next_port += 1;
                    port
                }
            };
            published.insert(container_port.clone(), host_port);
        }

        published
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    type Container = String;
    type Network = String;

    fn run_container(&self, params: &LaunchParams) -> Result<String> {
        let label = params
            .get("name")
            .or_else(|| params.get("image"))
            .and_then(ParamValue::as_str)
            .unwrap_or("?");
        self.record_command(&format!("run:{}", label));
        self.check_fail("run")?;

        let id = format!("mock-{}", self.containers.read().unwrap().len());
        let ports = self.publish_ports(params);

        self.containers.write().unwrap().insert(
            id.clone(),
            MockContainer {
                id: id.clone(),
                params: params.clone(),
                ports,
            },
        );
        Ok(id)
    }

    fn host_port(&self, container: &String, container_port: &str) -> Result<Option<u16>> {
        self.record_command(&format!("port:{}:{}", container, container_port));
        self.check_fail("port")?;

        let containers = self.containers.read().unwrap();
        let Some(found) = containers.get(container) else {
            bail!("Mock container {} não existe", container);
        };
        Ok(found.ports.get(container_port).copied())
    }

    fn create_network(&self, name: &str) -> Result<String> {
        self.record_command(&format!("network:{}", name));
        self.check_fail("network")?;

        self.networks.write().unwrap().push(name.to_string());
        Ok(format!("net-{}", name))
    }
}
