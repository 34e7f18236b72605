//! # Receipt Store
//!
//! The single externally observed unit composing the job tracker, the
//! collection manager, and the statistics cache into one coherent state
//! object with a unified error and loading surface.
//!
//! ## Architecture
//!
//! The store is a cheap-to-clone handle around shared inner state. Every
//! mutation goes through [`ReceiptStore::commit`], which applies the change
//! under the state lock and publishes a snapshot to watch-channel
//! subscribers; locks are never held across await points. The polling loop
//! runs as a single spawned task whose `JoinHandle` and session generation
//! are the only mutable polling resources, both owned here.
//!
//! ## Error channels
//!
//! Submission failures land on `upload_error`; everything else lands on
//! `error`. The channels are cleared independently, so an upload rejection
//! never masks an unrelated fetch failure.

pub mod collection;
pub mod job_tracker;
pub mod state;
pub mod statistics;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::ReceiptService;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::receipt::{Receipt, ReceiptPatch};
use state::StoreState;

pub(crate) struct PollSession {
    /// Bumped on every new session and cancellation; a loop whose captured
    /// generation no longer matches must discard its result
    pub(crate) generation: u64,
    pub(crate) handle: Option<JoinHandle<()>>,
}

pub(crate) struct StoreInner {
    pub(crate) service: Arc<dyn ReceiptService>,
    pub(crate) config: StoreConfig,
    pub(crate) state: RwLock<StoreState>,
    pub(crate) watch_tx: watch::Sender<StoreState>,
    pub(crate) poll: Mutex<PollSession>,
}

/// Client-side store for receipt capture and archive management
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use receipt_core::api::HttpReceiptService;
/// use receipt_core::config::{ReceiptApiConfig, StoreConfig};
/// use receipt_core::store::ReceiptStore;
///
/// # async fn example() -> receipt_core::error::StoreResult<()> {
/// let service = Arc::new(HttpReceiptService::new(ReceiptApiConfig::from_env()?)?);
/// let store = ReceiptStore::new(service, StoreConfig::default());
///
/// store.fetch_page(true).await?;
/// println!("{} receipts in view", store.snapshot().collection.receipts.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ReceiptStore {
    pub(crate) inner: Arc<StoreInner>,
}

impl ReceiptStore {
    /// Create a store over the given service boundary
    pub fn new(service: Arc<dyn ReceiptService>, config: StoreConfig) -> Self {
        let initial = StoreState::initial(&config);
        let (watch_tx, _) = watch::channel(initial.clone());

        Self {
            inner: Arc::new(StoreInner {
                service,
                config,
                state: RwLock::new(initial),
                watch_tx,
                poll: Mutex::new(PollSession {
                    generation: 0,
                    handle: None,
                }),
            }),
        }
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> StoreState {
        self.inner.state.read().clone()
    }

    /// Subscribe to state snapshots; a new value is published after every
    /// mutation
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.watch_tx.subscribe()
    }

    /// Apply a mutation under the state lock and publish the result
    pub(crate) fn commit<R>(&self, mutate: impl FnOnce(&mut StoreState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.inner.state.write();
            let result = mutate(&mut state);
            (result, state.clone())
        };
        // send_replace keeps the published value fresh even with no subscribers
        self.inner.watch_tx.send_replace(snapshot);
        result
    }

    /// Record an error on the general channel
    pub(crate) fn record_error(&self, err: &StoreError) {
        let message = err.to_string();
        self.commit(move |s| s.error = Some(message));
    }

    /// Clear the general error channel; the upload channel is untouched
    pub fn clear_error(&self) {
        self.commit(|s| s.error = None);
    }

    /// Clear the upload error channel; the general channel is untouched
    pub fn clear_upload_error(&self) {
        self.commit(|s| s.upload_error = None);
    }

    /// Apply field corrections to a receipt and mirror the result locally
    pub async fn update(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt> {
        match self.inner.service.update_one(receipt_id, patch).await {
            Ok(receipt) => {
                self.commit(|s| {
                    if let Some(existing) = s
                        .collection
                        .receipts
                        .iter_mut()
                        .find(|r| r.receipt_id == receipt.receipt_id)
                    {
                        *existing = receipt.clone();
                    }
                    if s.job.receipt_id.as_deref() == Some(receipt_id) {
                        s.job.receipt = Some(receipt.clone());
                    }
                });
                Ok(receipt)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Approve a receipt into the archive
    ///
    /// Bridges the job tracker into the collection: the approved record is
    /// prepended to the in-memory sequence, the total is incremented, and
    /// the statistics snapshot is refreshed. A statistics failure is
    /// recorded but does not fail the approval, which already succeeded.
    pub async fn approve(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt> {
        let receipt = match self.inner.service.approve_one(receipt_id, patch).await {
            Ok(receipt) => receipt,
            Err(err) => {
                self.record_error(&err);
                return Err(err);
            }
        };

        info!(receipt_id = %receipt.receipt_id, "Receipt approved into archive");
        self.commit(|s| {
            s.collection.receipts.insert(0, receipt.clone());
            s.collection.total += 1;
            if s.job.receipt_id.as_deref() == Some(receipt_id) {
                s.job.receipt = Some(receipt.clone());
            }
        });

        let _ = self.refresh_statistics().await;
        Ok(receipt)
    }

    /// Stop all in-flight polling and restore every sub-component to its
    /// initial empty state; used on session teardown
    pub fn reset(&self) {
        self.cancel_tracking();
        let initial = StoreState::initial(&self.inner.config);
        self.commit(move |s| *s = initial);
        info!("Receipt store reset to initial state");
    }
}
