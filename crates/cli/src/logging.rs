#![forbid(unsafe_code)]

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug)]
pub(crate) struct LoggingError(String);

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "logging: {}", self.0)
    }
}

impl std::error::Error for LoggingError {}

/// Installs the global subscriber. Events go to stderr; stdout carries
/// protocol responses only.
pub(crate) fn init_logging(directive: &str) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_new(directive)
        .map_err(|err| LoggingError(format!("invalid log filter '{directive}': {err}")))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|err| LoggingError(err.to_string()))
}
