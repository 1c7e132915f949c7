//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for table or JSON output.
//! `RUST_LOG` overrides the level chosen from the flags.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Safe to call more than once.
pub fn init(verbose: bool, quiet: bool) {
    let default = if verbose {
        "folio=debug,folio_analytics=debug,folio_math=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init();
}
