//! Global tracing setup for the binary

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use super::entry::LogLevel;
use super::store::LogStore;
use crate::error::{BalanceError, BalanceResult};

/// Environment variable holding a `tracing` filter for stderr output
pub const LOG_FILTER_ENV: &str = "MABOURSE_LOG";

/// Install the global subscriber: human-readable events on stderr plus the
/// log store
///
/// Stderr output is filtered by `MABOURSE_LOG` when set, otherwise by
/// `default_level`. The store applies its own minimum level.
pub fn init_tracing(store: &LogStore, default_level: LogLevel) -> BalanceResult<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!("mabourse={}", default_level.filter_directive()))
    });

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(stderr)
        .with(store.clone())
        .try_init()
        .map_err(|e| BalanceError::Config(format!("Failed to initialize logging: {}", e)))
}
