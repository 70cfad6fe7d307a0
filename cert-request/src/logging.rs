//! Sends [tracing] events to the browser console.

use tracing_subscriber_wasm::MakeConsoleWriter;

pub fn setup_logging() {
    let result = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(MakeConsoleWriter::default())
        .without_time()
        .with_ansi(false)
        .with_line_number(true)
        .with_file(true)
        .with_target(false)
        .try_init();
    if let Err(error) = result {
        tracing::debug!("Logging already set up: {error}");
        return;
    }
    let version = env!("CARGO_PKG_VERSION");
    tracing::trace!(version, "Setting logging: TRACE");
    tracing::debug!(version, "Setting logging: DEBUG");
    tracing::info!(version, "Setting logging: INFO");
}
