pub mod config;

pub use config::{E2eConfig, load_config};
