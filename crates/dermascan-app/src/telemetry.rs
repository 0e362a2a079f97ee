use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, falling back to [`DEFAULT_FILTER`]. Fails if a
/// subscriber is already installed.
pub fn init(format: LogFormat) -> eyre::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| eyre::eyre!("failed to install tracing subscriber: {e}"))
}
