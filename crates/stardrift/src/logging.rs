//! Log subscriber setup.
//!
//! The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use stardrift_config::Config;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive that beats the config.
pub const LOG_ENV: &str = "STARDRIFT_LOG";

/// Install the global subscriber. Returns the log file in use, or `None`
/// when no location could be determined (logging stays off).
pub fn init(config: &Config) -> Result<Option<PathBuf>> {
    let Some(path) = config.log_path() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log.filter)
            .wrap_err_with(|| format!("invalid log filter {:?}", config.log.filter))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install log subscriber: {e}"))?;

    Ok(Some(path))
}
