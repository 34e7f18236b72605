//! # Receipt Model
//!
//! The core domain entity: one processed receipt with structured fields
//! extracted from an uploaded image, plus the request/response shapes the
//! remote service boundary exchanges for it.
//!
//! Receipts are immutable by convention once approved; the store mutates its
//! copies only through the operations on [`crate::store::ReceiptStore`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::status::ReceiptStatus;

/// An extracted value paired with the OCR engine's confidence in it
///
/// Confidence lives in `[0.0, 1.0]` and is absent for values the user
/// entered or corrected by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl<T> ExtractedField<T> {
    /// A field without a confidence score (user-entered)
    pub fn new(value: T) -> Self {
        Self {
            value,
            confidence: None,
        }
    }

    /// A field as produced by the extraction engine
    pub fn with_confidence(value: T, confidence: f32) -> Self {
        Self {
            value,
            confidence: Some(confidence),
        }
    }
}

/// One processed receipt/expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Opaque server-assigned identifier, unique within a session
    pub receipt_id: String,
    pub status: ReceiptStatus,
    pub vendor: Option<ExtractedField<String>>,
    pub purchased_on: Option<ExtractedField<NaiveDate>>,
    pub total_amount: Option<ExtractedField<Decimal>>,
    pub category: Option<ExtractedField<String>>,
    /// Reference to the originally uploaded image
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied field corrections applied on update or approval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ReceiptPatch {
    /// Check whether the patch carries no corrections at all
    pub fn is_empty(&self) -> bool {
        self.vendor.is_none()
            && self.purchased_on.is_none()
            && self.total_amount.is_none()
            && self.category.is_none()
    }
}

/// Binary payload for a receipt image submission
///
/// Size and type constraints are validated by the remote service boundary,
/// not by the store.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadPayload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Boundary response to a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub receipt_id: String,
}

/// Boundary response to a status check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub receipt_id: String,
    pub status: ReceiptStatus,
    /// Human-readable failure reason when `status` is `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One page of archive results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptPage {
    pub receipts: Vec<Receipt>,
    /// Server-reported total across all pages; may be stale
    pub total: u64,
    pub has_more: bool,
}
