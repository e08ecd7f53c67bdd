use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{ConfigError, LoggingConfig};

/// Logging handle passed to each pipeline stage.
///
/// Holds its own dispatcher instead of installing a global subscriber, so a
/// stage can be run against a silent or capturing context in tests.
#[derive(Debug, Clone)]
pub struct LogContext {
    dispatch: Dispatch,
}

impl LogContext {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// A context that drops every event.
    pub fn silent() -> Self {
        Self::new(Dispatch::none())
    }

    pub fn from_config(config: &LoggingConfig) -> Result<Self, ConfigError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));
        let stdout = fmt::layer().with_file(true).with_line_number(true);

        if config.log_to_file {
            let file = std::fs::File::create(&config.log_file_path).map_err(|source| {
                ConfigError::LogFile {
                    path: config.log_file_path.clone(),
                    source,
                }
            })?;
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(Arc::new(file));

            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(stdout)
                .with(file_layer);
            Ok(Self::new(Dispatch::new(subscriber)))
        } else {
            let subscriber = tracing_subscriber::registry().with(filter).with(stdout);
            Ok(Self::new(Dispatch::new(subscriber)))
        }
    }

    /// Run `f` with this context's dispatcher as the current default, so the
    /// `tracing` events it emits land here.
    pub fn emit<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
