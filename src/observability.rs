//! Tracing subscriber setup.

use anyhow::{Error, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber once.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Events are written
/// as JSON lines. Later calls are no-ops.
///
/// # Errors
/// Returns an error when another global subscriber is already installed.
pub fn init() -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e: tracing_subscriber::util::TryInitError| Error::msg(e.to_string()))?;

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            "draw hunt planner tracing initialized"
        );
        Ok::<(), Error>(())
    })?;
    Ok(())
}
