//! # Operational Constants
//!
//! Polling and pagination defaults that define the operational boundaries
//! of the receipt store. Tunable per-instance through [`crate::config::StoreConfig`].

/// Milliseconds between consecutive status checks while a receipt is processing.
pub const POLL_INTERVAL_MS: u64 = 2_000;

/// Maximum status checks issued per polling session before the job is
/// declared timed out.
pub const MAX_POLL_TICKS: u32 = 30;

/// Receipts requested per archive page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default timeout for boundary HTTP requests, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
