//! # Store Configuration
//!
//! Tuning for the polling protocol, archive pagination, and the HTTP
//! boundary. Defaults come from [`crate::constants`]; every value can be
//! overridden through environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_MS, MAX_POLL_TICKS, POLL_INTERVAL_MS,
};
use crate::error::{StoreError, StoreResult};

/// Receipt store tuning
///
/// # Examples
///
/// ```rust
/// use receipt_core::config::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.poll_interval_ms, 2_000);
/// assert_eq!(config.max_poll_ticks, 30);
/// assert_eq!(config.page_size, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Milliseconds between consecutive status checks
    pub poll_interval_ms: u64,
    /// Maximum status checks per polling session before timing out
    pub max_poll_ticks: u32,
    /// Receipts requested per archive page
    pub page_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            max_poll_ticks: MAX_POLL_TICKS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StoreConfig {
    /// Load configuration with environment overrides
    pub fn from_env() -> StoreResult<Self> {
        let mut config = Self::default();

        if let Ok(interval) = std::env::var("RECEIPT_POLL_INTERVAL_MS") {
            config.poll_interval_ms = interval.parse().map_err(|e| {
                StoreError::config_error(format!("Invalid poll_interval_ms: {e}"))
            })?;
        }

        if let Ok(ticks) = std::env::var("RECEIPT_MAX_POLL_TICKS") {
            config.max_poll_ticks = ticks
                .parse()
                .map_err(|e| StoreError::config_error(format!("Invalid max_poll_ticks: {e}")))?;
        }

        if let Ok(page_size) = std::env::var("RECEIPT_PAGE_SIZE") {
            config.page_size = page_size
                .parse()
                .map_err(|e| StoreError::config_error(format!("Invalid page_size: {e}")))?;
        }

        Ok(config)
    }

    /// Interval between polling ticks as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Configuration for the receipt API boundary
///
/// # Examples
///
/// ```rust
/// use receipt_core::config::ReceiptApiConfig;
///
/// let config = ReceiptApiConfig::default();
/// assert_eq!(config.base_url, "http://localhost:8080");
/// assert_eq!(config.timeout_ms, 30000);
/// assert!(config.auth_token.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptApiConfig {
    /// Base URL for the receipt API (e.g., "<http://receipts:8080>")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Bearer token sent with every request (if required)
    pub auth_token: Option<String>,
}

impl Default for ReceiptApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            auth_token: None,
        }
    }
}

impl ReceiptApiConfig {
    /// Load configuration with environment overrides
    pub fn from_env() -> StoreResult<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("RECEIPT_API_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("RECEIPT_API_TIMEOUT_MS") {
            config.timeout_ms = timeout
                .parse()
                .map_err(|e| StoreError::config_error(format!("Invalid timeout_ms: {e}")))?;
        }

        if let Ok(token) = std::env::var("RECEIPT_API_TOKEN") {
            config.auth_token = Some(token);
        }

        Ok(config)
    }
}
