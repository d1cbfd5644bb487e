//! Tracing subscriber setup shared by both binaries

use crate::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// Keeps stdout free for a function response
    Stderr,
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &ObservabilityConfig, target: LogTarget) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match (config.json_logging, target) {
        (true, LogTarget::Stdout) => builder.json().try_init(),
        (true, LogTarget::Stderr) => builder.json().with_writer(std::io::stderr).try_init(),
        (false, LogTarget::Stdout) => builder.try_init(),
        (false, LogTarget::Stderr) => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(service = %config.service_name, "Tracing initialized");
    Ok(())
}
