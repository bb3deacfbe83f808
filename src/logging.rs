use crate::types::DisburseError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is an error.
pub fn init_logging(level: &str) -> Result<(), DisburseError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| DisburseError::config(format!("invalid log_level '{}': {}", level, e)))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| DisburseError::config(format!("logging already initialised: {}", e)))
}
