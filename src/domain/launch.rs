use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// Qdrant REST port inside the container
pub const HTTP_PORT: &str = "6333/tcp";
/// Qdrant gRPC port inside the container
pub const GRPC_PORT: &str = "6334/tcp";
pub const LOOPBACK: &str = "127.0.0.1";
pub const HOST_NETWORK_MODE: &str = "host";
/// Label docker compose puts on every container of a project
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Where a container port gets published on the host.
///
/// `host_port: None` leaves the port for the runtime to pick.
/// Serialized as the `(host_ip, host_port)` pair runtime clients expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBinding {
    pub host_ip: String,
    pub host_port: Option<u16>,
}

impl HostBinding {
    /// Loopback binding with an unassigned host port
    pub fn loopback() -> Self {
        Self {
            host_ip: LOOPBACK.to_string(),
            host_port: None,
        }
    }
}

impl Serialize for HostBinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.host_ip, self.host_port).serialize(serializer)
    }
}

/// A single launch parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
    #[serde(skip_deserializing)]
    Binding(HostBinding),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ParamValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_binding(&self) -> Option<&HostBinding> {
        match self {
            Self::Binding(binding) => Some(binding),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u16> for ParamValue {
    fn from(value: u16) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value.into_iter().map(Self::Str).collect())
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(value: BTreeMap<String, ParamValue>) -> Self {
        Self::Map(value)
    }
}

impl From<HostBinding> for ParamValue {
    fn from(value: HostBinding) -> Self {
        Self::Binding(value)
    }
}

/// Host path mount target, e.g. `{bind = "/qdrant/storage", mode = "rw"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBind {
    pub bind: String,
    #[serde(default = "default_volume_mode")]
    pub mode: String,
}

fn default_volume_mode() -> String {
    "rw".to_string()
}

impl From<&VolumeBind> for ParamValue {
    fn from(volume: &VolumeBind) -> Self {
        let mut map = BTreeMap::new();
        map.insert("bind".to_string(), volume.bind.as_str().into());
        map.insert("mode".to_string(), volume.mode.as_str().into());
        Self::Map(map)
    }
}

/// Overrides the image's default arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Shell(String),
    Exec(Vec<String>),
}

impl Command {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Shell(line) => line.is_empty(),
            Self::Exec(args) => args.is_empty(),
        }
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Self::Shell(value.to_string())
    }
}

impl From<Vec<String>> for Command {
    fn from(value: Vec<String>) -> Self {
        Self::Exec(value)
    }
}

impl From<Vec<&str>> for Command {
    fn from(value: Vec<&str>) -> Self {
        Self::Exec(value.into_iter().map(String::from).collect())
    }
}

impl From<&Command> for ParamValue {
    fn from(command: &Command) -> Self {
        match command {
            Command::Shell(line) => line.as_str().into(),
            Command::Exec(args) => args.clone().into(),
        }
    }
}

/// Parameters for a runtime client's container-run call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LaunchParams(BTreeMap<String, ParamValue>);

impl LaunchParams {
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets `key`, returning the value it replaced
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> BTreeMap<String, ParamValue> {
        self.0
    }
}

/// How to launch one Qdrant container.
///
/// Unset (or empty) optional fields are left out of the launch parameters so
/// the runtime's own defaults apply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    pub name: Option<String>,
    /// Passed through as-is, e.g. "512m"
    pub mem_limit: Option<String>,
    pub cpu_limit: Option<String>,
    pub network: Option<String>,
    /// "host" disables port publishing
    pub network_mode: Option<String>,
    pub volumes: BTreeMap<String, VolumeBind>,
    pub mounts: Vec<ParamValue>,
    pub environment: BTreeMap<String, String>,
    pub command: Option<Command>,
    pub remove: bool,
    pub detach: bool,
    /// Read by the harness's readiness wait, never translated
    pub exit_on_error: bool,
    /// Merged last: last writer wins, no conflict detection.
    pub additional_params: BTreeMap<String, ParamValue>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            name: None,
            mem_limit: None,
            cpu_limit: None,
            network: None,
            network_mode: None,
            volumes: BTreeMap::new(),
            mounts: Vec::new(),
            environment: BTreeMap::new(),
            command: None,
            remove: true,
            detach: true,
            exit_on_error: true,
            additional_params: BTreeMap::new(),
        }
    }
}

impl LaunchConfig {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mem_limit(mut self, limit: impl Into<String>) -> Self {
        self.mem_limit = Some(limit.into());
        self
    }

    pub fn cpu_limit(mut self, limit: impl Into<String>) -> Self {
        self.cpu_limit = Some(limit.into());
        self
    }

    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn network_mode(mut self, mode: impl Into<String>) -> Self {
        self.network_mode = Some(mode.into());
        self
    }

    pub fn volume(
        mut self,
        host_path: impl Into<String>,
        bind: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        self.volumes.insert(
            host_path.into(),
            VolumeBind {
                bind: bind.into(),
                mode: mode.into(),
            },
        );
        self
    }

    pub fn mount(mut self, mount: impl Into<ParamValue>) -> Self {
        self.mounts.push(mount.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn command(mut self, command: impl Into<Command>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    pub fn detach(mut self, detach: bool) -> Self {
        self.detach = detach;
        self
    }

    pub fn exit_on_error(mut self, exit_on_error: bool) -> Self {
        self.exit_on_error = exit_on_error;
        self
    }

    /// Adds a raw parameter that overrides anything computed
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }

    pub fn uses_host_network(&self) -> bool {
        self.network_mode.as_deref() == Some(HOST_NETWORK_MODE)
    }

    /// Compose project from the `labels` raw parameter, if any
    pub fn compose_project(&self) -> Option<&str> {
        self.additional_params
            .get("labels")?
            .as_map()?
            .get(COMPOSE_PROJECT_LABEL)?
            .as_str()
    }

    /// Translates this config into the run parameters for `image`.
    ///
    /// Pure: reads only `self`, never fails. Bad values (say a malformed
    /// `mem_limit`) surface when the runtime acts on the parameters.
    pub fn to_launch_params(&self, image: &str) -> LaunchParams {
        let mut params = LaunchParams::default();
        params.insert("image", image);
        params.insert("detach", self.detach);
        params.insert("remove", self.remove);

        if self.uses_host_network() {
            debug!("network_mode=host, portas não serão publicadas");
        } else {
            params.insert("ports", loopback_ports());
        }

        let optional: [(&str, Option<ParamValue>); 9] = [
            ("name", non_empty_str(&self.name)),
            ("mem_limit", non_empty_str(&self.mem_limit)),
            ("cpu_limit", non_empty_str(&self.cpu_limit)),
            ("network", non_empty_str(&self.network)),
            ("network_mode", non_empty_str(&self.network_mode)),
            ("volumes", self.volumes_param()),
            ("mounts", self.mounts_param()),
            ("environment", self.environment_param()),
            (
                "command",
                self.command
                    .as_ref()
                    .filter(|cmd| !cmd.is_empty())
                    .map(ParamValue::from),
            ),
        ];

        for (key, value) in optional {
            if let Some(value) = value {
                params.insert(key, value);
            }
        }

        for (key, value) in &self.additional_params {
            if params.insert(key.as_str(), value.clone()).is_some() {
                debug!(key = %key, "additional_params sobrescreveu valor calculado");
            }
        }

        params
    }

    fn volumes_param(&self) -> Option<ParamValue> {
        if self.volumes.is_empty() {
            return None;
        }

        let map = self
            .volumes
            .iter()
            .map(|(host, volume)| (host.clone(), ParamValue::from(volume)))
            .collect::<BTreeMap<_, _>>();
        Some(ParamValue::Map(map))
    }

    fn mounts_param(&self) -> Option<ParamValue> {
        if self.mounts.is_empty() {
            return None;
        }
        Some(ParamValue::List(self.mounts.clone()))
    }

    fn environment_param(&self) -> Option<ParamValue> {
        if self.environment.is_empty() {
            return None;
        }

        let map = self
            .environment
            .iter()
            .map(|(k, v)| (k.clone(), ParamValue::from(v.as_str())))
            .collect::<BTreeMap<_, _>>();
        Some(ParamValue::Map(map))
    }
}

fn non_empty_str(value: &Option<String>) -> Option<ParamValue> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(ParamValue::from)
}

fn loopback_ports() -> ParamValue {
    let mut ports = BTreeMap::new();
    ports.insert(HTTP_PORT.to_string(), HostBinding::loopback().into());
    ports.insert(GRPC_PORT.to_string(), HostBinding::loopback().into());
    ParamValue::Map(ports)
}
