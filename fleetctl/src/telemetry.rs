//! Tracing initialization.
//!
//! Logs go to stdout through the `tracing_subscriber` fmt layer. The filter is taken from
//! `RUST_LOG` when set, otherwise from the `log_level` configuration value:
//!
//! ```bash
//! RUST_LOG="fleetctl=debug,tower_http=info" fleetctl -f config.yaml
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// `default_filter` is used when `RUST_LOG` is unset or unparseable.
pub fn init_telemetry(default_filter: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");
    Ok(())
}
