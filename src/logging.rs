//! Sets up logging for the binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Log warnings and errors to stderr and everything allowed by `RUST_LOG`
/// (default `debug`) to the file at `log_path`.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn setup_logging(log_path: &Path) -> Result<(), io::Error> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stderr);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_log.with_filter(filter::LevelFilter::WARN))
        .with(debug_log)
        .init();

    Ok(())
}
