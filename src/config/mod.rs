mod job_config;
mod logging_config;
pub mod config;

pub use config::{Config, ConfigError};
pub use job_config::{Cli, JobConfig};
pub use logging_config::LoggingConfig;
