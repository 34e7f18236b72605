//! # Store Error Types
//!
//! Unified error handling for store operations and the remote service boundary.

use thiserror::Error;

/// Store operation result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy for receipt store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The boundary rejected the payload before processing began
    /// (oversize file, unsupported type, duplicate on submit, quota exceeded).
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    /// The backend reported a failure during extraction.
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// The polling tick bound was exceeded without a terminal status.
    #[error("Processing timed out after {ticks} status checks")]
    ProcessingTimedOut { ticks: u32 },

    /// Not a failure: the backend recognized the content as already archived.
    #[error("Duplicate receipt: content already archived as {existing_id}")]
    DuplicateDetected { existing_id: String },

    /// An update, approval, or deletion was rejected by the backend.
    #[error("Mutation rejected: {operation} - {message}")]
    MutationFailed { operation: String, message: String },

    /// A list, search, or statistics request failed.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// An operation was invoked from a job phase that does not permit it.
    #[error("Invalid job state: {0}")]
    InvalidState(String),

    /// Non-success HTTP response outside the semantic taxonomy above.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a mutation error for a named backend operation
    pub fn mutation_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MutationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an API error from an HTTP response
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check whether this error is the duplicate terminal condition rather
    /// than a genuine fault.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateDetected { .. })
    }

    /// Check if the error is recoverable (worth a deliberate user retry)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Http(e) => e.is_timeout() || e.is_connect(),
            StoreError::Api { status, .. } => *status >= 500,
            StoreError::ProcessingFailed(_) => true,
            StoreError::ProcessingTimedOut { .. } => true,
            StoreError::FetchFailed(_) => true,
            _ => false,
        }
    }
}
