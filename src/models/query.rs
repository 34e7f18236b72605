//! # Archive Query Criteria
//!
//! The filter, sort, and search state governing which receipts the
//! collection manager requests. Changing any criteria invalidates the
//! current page state and resets pagination to the first page.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::status::ReceiptStatus;

/// Field the archive is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    PurchasedOn,
    TotalAmount,
    Vendor,
    Category,
    CreatedAt,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PurchasedOn => write!(f, "purchased_on"),
            Self::TotalAmount => write!(f, "total_amount"),
            Self::Vendor => write!(f, "vendor"),
            Self::Category => write!(f, "category"),
            Self::CreatedAt => write!(f, "created_at"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Active sort specification
///
/// The boundary owns ordering, including tie-breaks under equal keys; the
/// store never re-sorts a fetched sequence client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::PurchasedOn,
            direction: SortDirection::Desc,
        }
    }
}

/// Active filter and search criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptFilters {
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Empty means all statuses
    pub statuses: Vec<ReceiptStatus>,
    pub amount_min: Option<Decimal>,
    pub amount_max: Option<Decimal>,
    /// Free-text query; when set, fetches go through the boundary's search
    /// operation, which supersedes the other criteria
    pub query: Option<String>,
}

impl ReceiptFilters {
    /// Check whether no filter or search criteria are active
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.statuses.is_empty()
            && self.amount_min.is_none()
            && self.amount_max.is_none()
            && self.query.is_none()
    }

    /// Merge the given fields into the active criteria
    ///
    /// A merge returns the collection to filtered-list fetching: any active
    /// free-text query is cleared so the new filters are not silently
    /// ignored by the search endpoint.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(date_from) = patch.date_from {
            self.date_from = Some(date_from);
        }
        if let Some(date_to) = patch.date_to {
            self.date_to = Some(date_to);
        }
        if let Some(statuses) = patch.statuses {
            self.statuses = statuses;
        }
        if let Some(amount_min) = patch.amount_min {
            self.amount_min = Some(amount_min);
        }
        if let Some(amount_max) = patch.amount_max {
            self.amount_max = Some(amount_max);
        }
        self.query = None;
    }
}

/// Partial criteria update; only the fields present are merged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPatch {
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub statuses: Option<Vec<ReceiptStatus>>,
    pub amount_min: Option<Decimal>,
    pub amount_max: Option<Decimal>,
}
