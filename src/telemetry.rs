use tracing_subscriber::EnvFilter;

use crate::error::{BasketError, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. Output goes to stderr.
pub fn init(log_level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).map_err(|e| {
            BasketError::Telemetry(format!("invalid log level '{}': {}", log_level, e))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| BasketError::Telemetry(e.to_string()))
}
