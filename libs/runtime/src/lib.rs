//! Process-level plumbing shared by the contacts binaries:
//! layered configuration, logging initialisation and home directory resolution.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{default_logging_config, AppConfig, AppSection, CliArgs, LoggingConfig, Section};
