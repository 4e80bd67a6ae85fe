//! Tracing initialization for binaries embedding the session engine.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an env-filter and a fmt layer.
///
/// Defaults to info level for this crate if `RUST_LOG` is not set. Safe to
/// call multiple times; subsequent calls are no-ops.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greenbasket_checkout=info".into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
