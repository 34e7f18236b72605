//! # Remote Service Boundary
//!
//! The opaque request/response interface the store drives. Latency and
//! transient failure are expected; every operation is awaited and returns a
//! typed result. The store holds the boundary as `Arc<dyn ReceiptService>`,
//! so hosts can substitute transports and tests can script responses.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::query::{ReceiptFilters, SortSpec};
use crate::models::receipt::{
    Receipt, ReceiptPage, ReceiptPatch, StatusResponse, SubmitResponse, UploadPayload,
};
use crate::models::statistics::ReceiptStatistics;

pub mod http_client;

pub use http_client::HttpReceiptService;

/// Operations offered by the receipt processing backend
#[async_trait]
pub trait ReceiptService: Send + Sync {
    /// Submit a receipt image for extraction; fails with
    /// [`crate::error::StoreError::UploadRejected`] on validation failure
    async fn submit(&self, payload: UploadPayload) -> StoreResult<SubmitResponse>;

    /// Check the processing status of a submitted receipt
    async fn get_status(&self, receipt_id: &str) -> StoreResult<StatusResponse>;

    /// Fetch the full record for one receipt
    async fn get_one(&self, receipt_id: &str) -> StoreResult<Receipt>;

    /// Ask the backend to re-run extraction for a failed receipt
    async fn retry(&self, receipt_id: &str) -> StoreResult<()>;

    /// Apply field corrections to a receipt
    async fn update_one(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt>;

    /// Approve a receipt into the archive with final field values
    async fn approve_one(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt>;

    /// Delete a receipt
    async fn delete_one(&self, receipt_id: &str) -> StoreResult<()>;

    /// List one archive page under the given criteria and sort
    async fn list(
        &self,
        filters: &ReceiptFilters,
        sort: &SortSpec,
        page: u32,
        per_page: u32,
    ) -> StoreResult<ReceiptPage>;

    /// Free-text search over the archive; ranking supersedes filter criteria
    async fn search(&self, query: &str, page: u32, per_page: u32) -> StoreResult<ReceiptPage>;

    /// Fetch the aggregate statistics snapshot
    async fn get_statistics(&self) -> StoreResult<ReceiptStatistics>;
}
