//! # Tracing helpers

use error_stack::{Result, ResultExt};
use tracing::Subscriber;
use tracing_subscriber::{prelude::*, registry::LookupSpan, EnvFilter, Layer};

const RUST_LOG_FORMAT: &str = "RUST_LOG_FORMAT";

pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

#[derive(Debug)]
pub struct TracingInitError;
impl error_stack::Context for TracingInitError {}

impl std::fmt::Display for TracingInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("failed to initialize tracing")
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Reads the format from the `RUST_LOG_FORMAT` environment variable.
    pub fn from_env() -> Self {
        std::env::var(RUST_LOG_FORMAT)
            .map(|val| Self::from_name(&val))
            .unwrap_or_default()
    }

    fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Logs are filtered with `RUST_LOG` (defaults to `info`) and written to stdout, either as
/// human readable text or as json lines when `RUST_LOG_FORMAT=json`.
///
/// ```rs
/// use stkr_observability::init_tracing;
///
/// init_tracing().unwrap();
/// ```
pub fn init_tracing() -> Result<(), TracingInitError> {
    let layers = vec![stdout(LogFormat::from_env())];

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .change_context(TracingInitError)
        .attach_printable("a global subscriber is already installed")?;

    Ok(())
}

fn stdout<S>(format: LogFormat) -> BoxedLayer<S>
where
    S: Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let log_env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("INFO"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .json()
            .with_filter(log_env_filter)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
            .compact()
            .with_filter(log_env_filter)
            .boxed(),
    }
}
