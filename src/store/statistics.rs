//! # Statistics Cache
//!
//! Holds one aggregate snapshot, fetched on demand and refreshed after any
//! operation that changes the archive's composition (approval, deletion).

use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::store::ReceiptStore;

impl ReceiptStore {
    /// Replace the cached statistics snapshot wholesale
    ///
    /// No partial update exists: aggregates are not composable client-side
    /// without re-deriving the query the server already ran.
    pub async fn refresh_statistics(&self) -> StoreResult<()> {
        match self.inner.service.get_statistics().await {
            Ok(snapshot) => {
                debug!(
                    receipt_count = snapshot.receipt_count,
                    "Statistics snapshot refreshed"
                );
                self.commit(move |s| s.statistics = Some(snapshot));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Statistics refresh failed");
                self.record_error(&err);
                Err(err)
            }
        }
    }
}
