//! # Data Model
//!
//! Domain entities and value objects exchanged with the remote service
//! boundary: receipts with confidence-scored extracted fields, lifecycle
//! status enums, archive query criteria, and the cached statistics snapshot.

pub mod query;
pub mod receipt;
pub mod statistics;
pub mod status;

pub use query::{FilterPatch, ReceiptFilters, SortDirection, SortField, SortSpec};
pub use receipt::{
    ExtractedField, Receipt, ReceiptPage, ReceiptPatch, StatusResponse, SubmitResponse,
    UploadPayload,
};
pub use statistics::{CategoryBreakdown, MonthlyBreakdown, ReceiptStatistics};
pub use status::{JobPhase, ReceiptStatus};
