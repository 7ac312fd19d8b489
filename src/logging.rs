//! logging
//!
//! Diagnostic logging via `tracing`. Events go to stderr so stdout stays
//! reserved for outcome lines and `list-locales` output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(debug: bool, quiet: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the flags. Calling this twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn setup_logging(debug: bool, quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug, quiet)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug),
        )
        .try_init();
}
