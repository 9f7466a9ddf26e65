mod cluster;
mod container;
pub mod launch;
pub mod traits;

pub use cluster::ClusterHandle;
pub use container::ContainerHandle;
pub use launch::{Command, HostBinding, LaunchConfig, LaunchParams, ParamValue, VolumeBind};
pub use traits::ContainerRuntime;
