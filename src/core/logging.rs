//! Logging initialization.
//!
//! Builds a `tracing` subscriber with an env-overridable filter
//! (`RUST_LOG`) and a compact fmt layer. Safe to call more than once;
//! repeated initialization is a no-op.

use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize the global subscriber. Defaults to `info` when `RUST_LOG` is
/// unset or unparseable.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // try_init: another subscriber (e.g. a test harness) may already own
        // the global dispatcher
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    });
}
