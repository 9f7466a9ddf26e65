use std::fmt;

/// A running Qdrant node as seen by the e2e harness.
///
/// `C` is whatever the runtime client hands back for a started container
/// (an id, a client object, ...). The handle keeps it around so the harness
/// can inspect or stop the container later; dropping the handle never
/// stops anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle<C> {
    container: C,
    host: String,
    name: String,
    http_port: u16,
    grpc_port: Option<u16>,
    compose_project: Option<String>,
}

impl<C> ContainerHandle<C> {
    pub fn new(
        container: C,
        host: impl Into<String>,
        name: impl Into<String>,
        http_port: u16,
        grpc_port: Option<u16>,
    ) -> Self {
        Self {
            container,
            host: host.into(),
            name: name.into(),
            http_port,
            grpc_port,
            compose_project: None,
        }
    }

    /// Marks the node as part of a compose project
    pub fn with_compose_project(mut self, project: impl Into<String>) -> Self {
        self.compose_project = Some(project.into());
        self
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub fn grpc_port(&self) -> Option<u16> {
        self.grpc_port
    }

    pub fn compose_project(&self) -> Option<&str> {
        self.compose_project.as_deref()
    }

    /// Base URL of the REST API
    pub fn http_url(&self) -> String {
        format!("http://{}:{}", self.host, self.http_port)
    }

    /// Base URL of the gRPC API, if the node exposes one
    pub fn grpc_url(&self) -> Option<String> {
        self.grpc_port
            .map(|port| format!("http://{}:{}", self.host, port))
    }
}

impl<C> fmt::Display for ContainerHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ContainerHandle(name='{}', host='{}', http_port={}, grpc_port=",
            self.name, self.host, self.http_port
        )?;
        match self.grpc_port {
            Some(port) => write!(f, "{port})"),
            None => write!(f, "None)"),
        }
    }
}
