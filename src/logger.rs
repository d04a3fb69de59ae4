use std::sync::Once;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

static INIT: Once = Once::new();

/// A simple logger.
///
/// Set the `RUST_LOG` environment variable to `debug` to see run-state
/// transitions, or `trace` to log every cycle. Logging is off by default and
/// always goes to stderr.
pub fn setup_logger() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

        tracing_subscriber::fmt()
            .compact()
            .with_file(false)
            .with_target(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
    });
}
