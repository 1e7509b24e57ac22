//! Telemetry logic.
//! Structured logs written to stderr, stdout being kept for script results.
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{Log, LogFormat};

/// Build the log filter, `RUST_LOG` taking precedence over configuration.
fn filter(log: &Log) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&log.level).unwrap_or_else(|err| {
            eprintln!("invalid log level {:?}: {err}", log.level);
            EnvFilter::new("info")
        })
    })
}

/// Install the global subscriber.
pub fn setup_logging(log: &Log) -> Result<(), TryInitError> {
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match log.format {
        LogFormat::Full => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter(log)))
        .try_init()
}
