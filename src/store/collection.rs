//! # Collection Manager
//!
//! Maintains the visible page(s) of the receipt archive consistent with the
//! active filter, sort, and search criteria. Fresh queries replace the
//! stored sequence; `load_more` appends the next page. Result order is
//! always the boundary's: appended pages are concatenated as received, so
//! server-side tie-breaks survive.

use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::models::query::{FilterPatch, ReceiptFilters, SortSpec};
use crate::store::ReceiptStore;

impl ReceiptStore {
    /// Fetch one archive page under the current criteria
    ///
    /// With `reset` the result replaces the stored sequence from page 1;
    /// otherwise it is appended at the current cursor. Overlapping calls
    /// proceed independently, last write wins; callers guard against
    /// redundant fetches through [`ReceiptStore::load_more`].
    pub async fn fetch_page(&self, reset: bool) -> StoreResult<()> {
        let (filters, sort, page, per_page) = self.commit(|s| {
            if reset {
                s.collection.page = 1;
            }
            s.collection.loading = true;
            (
                s.collection.filters.clone(),
                s.collection.sort,
                s.collection.page,
                s.collection.per_page,
            )
        });

        let result = match filters.query.as_deref().filter(|q| !q.is_empty()) {
            Some(query) => self.inner.service.search(query, page, per_page).await,
            None => self.inner.service.list(&filters, &sort, page, per_page).await,
        };

        match result {
            Ok(fetched) => {
                debug!(
                    page,
                    received = fetched.receipts.len(),
                    total = fetched.total,
                    has_more = fetched.has_more,
                    "Archive page fetched"
                );
                self.commit(move |s| {
                    if reset {
                        s.collection.receipts = fetched.receipts;
                    } else {
                        s.collection.receipts.extend(fetched.receipts);
                    }
                    s.collection.total = fetched.total;
                    s.collection.has_more = fetched.has_more;
                    s.collection.loading = false;
                });
                Ok(())
            }
            Err(err) => {
                warn!(page, error = %err, "Archive page fetch failed");
                let message = err.to_string();
                self.commit(move |s| {
                    s.collection.loading = false;
                    s.error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// Append the next archive page
    ///
    /// No-ops unless more pages are available and no fetch is in flight —
    /// this guard prevents duplicate concurrent page requests and is a
    /// correctness invariant, not an optimization.
    pub async fn load_more(&self) -> StoreResult<()> {
        let proceed = self.commit(|s| {
            if !s.collection.has_more || s.collection.loading {
                return false;
            }
            s.collection.page += 1;
            s.collection.loading = true;
            true
        });

        if !proceed {
            debug!("load_more ignored: no further pages or a fetch is in flight");
            return Ok(());
        }
        self.fetch_page(false).await
    }

    /// Replace the archive view with free-text search results
    ///
    /// The query supersedes filter criteria at the boundary; pagination
    /// resets and the sequence is replaced, never appended. An empty query
    /// clears the search and falls back to a filtered list fetch.
    pub async fn search(&self, query: impl Into<String>) -> StoreResult<()> {
        let query = query.into();
        info!(query = %query, "Searching receipt archive");
        self.commit(|s| {
            s.collection.filters.query = if query.is_empty() {
                None
            } else {
                Some(query.clone())
            };
        });
        self.fetch_page(true).await
    }

    /// Merge the given fields into the active criteria and refetch
    pub async fn set_criteria(&self, patch: FilterPatch) -> StoreResult<()> {
        self.commit(|s| s.collection.filters.apply(patch));
        self.fetch_page(true).await
    }

    /// Reset all filter and search state to defaults and refetch
    pub async fn clear_criteria(&self) -> StoreResult<()> {
        self.commit(|s| s.collection.filters = ReceiptFilters::default());
        self.fetch_page(true).await
    }

    /// Replace the active sort and refetch from the first page
    pub async fn set_sort(&self, sort: SortSpec) -> StoreResult<()> {
        self.commit(|s| s.collection.sort = sort);
        self.fetch_page(true).await
    }

    /// Remove a receipt locally before the backend confirms deletion
    ///
    /// The prior sequence and total are captured first; on backend failure
    /// they are restored exactly and the error is recorded as well as
    /// returned. On success the statistics snapshot is refreshed.
    pub async fn remove_optimistically(&self, receipt_id: &str) -> StoreResult<()> {
        let (prior_receipts, prior_total) = self.commit(|s| {
            let prior = (s.collection.receipts.clone(), s.collection.total);
            let before = s.collection.receipts.len();
            s.collection.receipts.retain(|r| r.receipt_id != receipt_id);
            if s.collection.receipts.len() < before {
                s.collection.total = s.collection.total.saturating_sub(1);
            }
            prior
        });

        match self.inner.service.delete_one(receipt_id).await {
            Ok(()) => {
                debug!(receipt_id = %receipt_id, "Receipt deletion confirmed");
                let _ = self.refresh_statistics().await;
                Ok(())
            }
            Err(err) => {
                warn!(receipt_id = %receipt_id, error = %err, "Deletion rejected, rolling back");
                let message = err.to_string();
                self.commit(move |s| {
                    s.collection.receipts = prior_receipts;
                    s.collection.total = prior_total;
                    s.error = Some(message);
                });
                Err(err)
            }
        }
    }
}
