use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CRYPTER_LOG";

/// Installs the stderr subscriber. Stdout carries payloads and stays clean.
///
/// The filter comes from `CRYPTER_LOG` (e.g. `crypter=debug`) and defaults to
/// `warn`.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise tracing subscriber: {e}"))
}
