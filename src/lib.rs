pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{
    ClusterHandle, Command, ContainerHandle, ContainerRuntime, LaunchConfig, LaunchParams,
    ParamValue,
};
pub use infra::E2eConfig;
pub use services::NodeLauncher;
