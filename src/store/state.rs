//! # Observed Store State
//!
//! The state object UI collaborators observe. Snapshots are cheap clones
//! published over a watch channel after every mutation; nothing outside the
//! store's operations may write to them.

use serde::Serialize;

use crate::config::StoreConfig;
use crate::models::query::{ReceiptFilters, SortSpec};
use crate::models::receipt::Receipt;
use crate::models::statistics::ReceiptStatistics;
use crate::models::status::JobPhase;

/// Transient state of the single tracked upload job
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobState {
    pub phase: JobPhase,
    /// Identifier assigned at submission
    pub receipt_id: Option<String>,
    /// Full record, fetched once a terminal status is reached
    pub receipt: Option<Receipt>,
    /// Status checks issued in the current polling session
    pub ticks: u32,
    /// Human-readable reason when the phase is failed or timed_out
    pub failure: Option<String>,
}

/// Paginated view of the receipt archive under the active criteria
#[derive(Debug, Clone, Serialize)]
pub struct CollectionState {
    /// Fetched receipts in boundary order; never re-sorted client-side
    pub receipts: Vec<Receipt>,
    /// 1-based page cursor
    pub page: u32,
    pub per_page: u32,
    /// Server-reported total across all pages
    pub total: u64,
    pub has_more: bool,
    /// A list or search fetch is in flight
    pub loading: bool,
    pub filters: ReceiptFilters,
    pub sort: SortSpec,
}

impl CollectionState {
    pub(crate) fn with_page_size(per_page: u32) -> Self {
        Self {
            receipts: Vec::new(),
            page: 1,
            per_page,
            total: 0,
            has_more: false,
            loading: false,
            filters: ReceiptFilters::default(),
            sort: SortSpec::default(),
        }
    }
}

impl Default for CollectionState {
    fn default() -> Self {
        Self::with_page_size(crate::constants::DEFAULT_PAGE_SIZE)
    }
}

/// The full externally observed state object
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreState {
    pub job: JobState,
    pub collection: CollectionState,
    /// Cached aggregate snapshot; `None` until first refreshed
    pub statistics: Option<ReceiptStatistics>,
    /// Submission failures; independent of the general channel
    pub upload_error: Option<String>,
    /// Failures from every other operation
    pub error: Option<String>,
}

impl StoreState {
    pub(crate) fn initial(config: &StoreConfig) -> Self {
        Self {
            collection: CollectionState::with_page_size(config.page_size),
            ..Self::default()
        }
    }
}
