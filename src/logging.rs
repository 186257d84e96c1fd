//! Tracing initialisation.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "SPARKX_LOG";

fn filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("invalid log level '{}'", settings.level)),
    }
}

/// Install the global subscriber.
///
/// Logs go to the configured file when there is one. Otherwise they go to
/// stderr, except in `interactive` mode where the terminal belongs to the
/// dashboard and logging stays off.
pub fn init(settings: &LoggingSettings, interactive: bool) -> Result<()> {
    let filter = filter(settings)?;

    let result = match &settings.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None if interactive => return Ok(()),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| anyhow!("failed to install logger: {}", e))
}
