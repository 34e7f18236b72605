//! # Statistics Snapshot
//!
//! Server-derived aggregates over the receipt archive. The snapshot is
//! created on first fetch and replaced wholesale on each refresh; it is
//! never patched incrementally, since aggregates are not composable
//! client-side without re-deriving the query the server already ran.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate totals for a single spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub receipt_count: u64,
    pub total_amount: Decimal,
}

/// Aggregate totals for a single calendar month (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub month: String,
    pub receipt_count: u64,
    pub total_amount: Decimal,
}

/// One cached aggregate snapshot over the archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptStatistics {
    pub receipt_count: u64,
    pub total_amount: Decimal,
    pub average_amount: Decimal,
    pub by_category: Vec<CategoryBreakdown>,
    pub by_month: Vec<MonthlyBreakdown>,
    pub generated_at: DateTime<Utc>,
}
