//! Shared setup for commands that talk to the routing service.

use tracing::info;
use wayframe::config::ConfigFile;
use wayframe::logging::{self, WorkerGuard};

use crate::error::CliError;

/// Loaded configuration plus installed logging.
///
/// Keep the runner alive for the whole command so buffered file logs are
/// flushed on exit.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Load config and install the tracing subscriber.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let log_guard = logging::init(&config.logging)?;
        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = wayframe::VERSION,
            command,
            router = %self.config.routing.base_url,
            profile = %self.config.routing.profile,
            "wayframe starting"
        );
    }

    /// Multi-threaded runtime for the command's async work.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }
}
