//! Diagnostics logging
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - one line per flushed batch
//! - `RUST_LOG=bindform::binding=trace` - every classified token

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber, logging to stderr
///
/// Respects RUST_LOG for filtering, `warn` when unset. Stdout is left to the
/// compiled output.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    tracing_subscriber::registry().with(console_layer).init();
}
