//! # Structured Logging Module
//!
//! Console-oriented structured logging for debugging the store's async
//! polling and fetch operations.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging, filtered through `RUST_LOG`
///
/// Safe to call more than once; later calls are no-ops, and an already
/// installed global subscriber (e.g. from a host application) is left in
/// place.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("receipt_core=info"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }
    });
}
