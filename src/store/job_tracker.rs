//! # Job Tracker
//!
//! Drives one receipt from submission to a terminal state using a bounded
//! polling protocol, without blocking callers.
//!
//! The loop is a single spawned task that alternates sleep and status
//! check, so ticks are strictly sequential: a new check is never issued
//! while a prior one is pending. The first tick fires immediately to keep
//! perceived latency low against fast backends. Cancellation bumps the
//! session generation; a response already in flight is discarded when the
//! generation no longer matches, never applied afterwards.

use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::receipt::UploadPayload;
use crate::models::status::{JobPhase, ReceiptStatus};
use crate::store::state::JobState;
use crate::store::ReceiptStore;

impl ReceiptStore {
    /// Submit a receipt image and begin tracking its extraction
    ///
    /// Returns the assigned identifier. On rejection the job returns to
    /// `idle` with the failure recorded on the upload error channel, and
    /// the error is returned to the caller.
    pub async fn submit(&self, payload: UploadPayload) -> StoreResult<String> {
        // At most one active polling loop system-wide
        self.cancel_tracking();

        let file_name = payload.file_name.clone();
        info!(file_name = %file_name, "Submitting receipt for extraction");
        self.commit(|s| {
            s.job = JobState {
                phase: JobPhase::Uploading,
                ..JobState::default()
            };
            s.upload_error = None;
        });

        match self.inner.service.submit(payload).await {
            Ok(response) => {
                let receipt_id = response.receipt_id;
                info!(receipt_id = %receipt_id, "Receipt accepted, polling for status");
                self.start_poll_session(receipt_id.clone());
                Ok(receipt_id)
            }
            Err(err) => {
                warn!(file_name = %file_name, error = %err, "Receipt submission failed");
                let message = err.to_string();
                self.commit(move |s| {
                    s.job = JobState::default();
                    s.upload_error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// Re-run extraction for a failed or timed-out job
    ///
    /// Restarts the polling loop from tick zero.
    pub async fn retry(&self, receipt_id: &str) -> StoreResult<()> {
        let phase = self.snapshot().job.phase;
        if !phase.can_retry() {
            let err = StoreError::InvalidState(format!(
                "retry is only valid from failed or timed_out, current phase is {phase}"
            ));
            self.record_error(&err);
            return Err(err);
        }

        match self.inner.service.retry(receipt_id).await {
            Ok(()) => {
                info!(receipt_id = %receipt_id, "Retrying extraction");
                self.commit(|s| {
                    s.job.failure = None;
                    s.job.receipt_id = Some(receipt_id.to_string());
                    // the recorded processing failure is superseded by the new session
                    s.error = None;
                });
                self.start_poll_session(receipt_id.to_string());
                Ok(())
            }
            Err(err) => {
                warn!(receipt_id = %receipt_id, error = %err, "Retry request rejected");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Stop any active polling loop without contacting the backend
    ///
    /// Idempotent; safe to call when no loop is active. Job state is left
    /// as-is — [`ReceiptStore::reset`] is the state-clearing operation.
    pub fn cancel_tracking(&self) {
        let mut poll = self.inner.poll.lock();
        poll.generation += 1;
        if let Some(handle) = poll.handle.take() {
            handle.abort();
            debug!("Cancelled active polling session");
        }
    }

    fn start_poll_session(&self, receipt_id: String) {
        let generation = {
            let mut poll = self.inner.poll.lock();
            poll.generation += 1;
            if let Some(handle) = poll.handle.take() {
                handle.abort();
            }
            poll.generation
        };

        self.commit(|s| {
            s.job.phase = JobPhase::Polling;
            s.job.receipt_id = Some(receipt_id.clone());
            s.job.ticks = 0;
        });

        let store = self.clone();
        let handle = tokio::spawn(async move {
            store.run_poll_loop(receipt_id, generation).await;
        });

        // A cancellation may have raced the spawn; never keep a stale handle
        let mut poll = self.inner.poll.lock();
        if poll.generation == generation {
            poll.handle = Some(handle);
        } else {
            handle.abort();
        }
    }

    fn poll_session_active(&self, generation: u64) -> bool {
        self.inner.poll.lock().generation == generation
    }

    /// Drop the finished loop's handle without invalidating the session
    fn finish_poll_session(&self, generation: u64) {
        let mut poll = self.inner.poll.lock();
        if poll.generation == generation {
            poll.handle = None;
        }
    }

    async fn run_poll_loop(self, receipt_id: String, generation: u64) {
        let interval = self.inner.config.poll_interval();
        let max_ticks = self.inner.config.max_poll_ticks;

        for tick in 0..max_ticks {
            // First tick fires immediately
            if tick > 0 {
                tokio::time::sleep(interval).await;
            }
            if !self.poll_session_active(generation) {
                return;
            }

            let outcome = self.inner.service.get_status(&receipt_id).await;
            if !self.poll_session_active(generation) {
                debug!(receipt_id = %receipt_id, "Discarding status response from cancelled session");
                return;
            }
            self.commit(|s| s.job.ticks = tick + 1);

            let status = match outcome {
                Ok(response) => response,
                Err(err) => {
                    // Tick errors are terminal for the session; retry is a
                    // deliberate user action
                    warn!(receipt_id = %receipt_id, error = %err, "Status check failed, stopping polling");
                    let message = err.to_string();
                    self.finish_poll_session(generation);
                    self.commit(move |s| {
                        s.job.phase = JobPhase::Failed;
                        s.job.failure = Some(message.clone());
                        s.error = Some(message);
                    });
                    return;
                }
            };

            match status.status {
                ReceiptStatus::Processing => {
                    debug!(receipt_id = %receipt_id, tick = tick + 1, "Receipt still processing");
                }
                ReceiptStatus::Review | ReceiptStatus::Approved => {
                    self.resolve_job(&receipt_id, generation).await;
                    return;
                }
                ReceiptStatus::Failed => {
                    let reason = status
                        .message
                        .unwrap_or_else(|| "extraction failed".to_string());
                    warn!(receipt_id = %receipt_id, reason = %reason, "Extraction failed");
                    let err = StoreError::ProcessingFailed(reason.clone());
                    self.finish_poll_session(generation);
                    self.commit(move |s| {
                        s.job.phase = JobPhase::Failed;
                        s.job.failure = Some(reason);
                        s.error = Some(err.to_string());
                    });
                    return;
                }
                ReceiptStatus::Duplicate => {
                    self.resolve_duplicate(&receipt_id, generation).await;
                    return;
                }
            }
        }

        if !self.poll_session_active(generation) {
            return;
        }
        warn!(receipt_id = %receipt_id, ticks = max_ticks, "Polling bound exceeded");
        let err = StoreError::ProcessingTimedOut { ticks: max_ticks };
        let message = err.to_string();
        self.finish_poll_session(generation);
        self.commit(move |s| {
            s.job.phase = JobPhase::TimedOut;
            s.job.failure = Some(message.clone());
            s.error = Some(message);
        });
    }

    async fn resolve_job(&self, receipt_id: &str, generation: u64) {
        let outcome = self.inner.service.get_one(receipt_id).await;
        if !self.poll_session_active(generation) {
            return;
        }
        self.finish_poll_session(generation);

        match outcome {
            Ok(receipt) => {
                info!(receipt_id = %receipt_id, status = %receipt.status, "Receipt ready for review");
                self.commit(move |s| {
                    s.job.phase = JobPhase::Resolved;
                    s.job.receipt = Some(receipt);
                });
            }
            Err(err) => {
                warn!(receipt_id = %receipt_id, error = %err, "Failed to fetch resolved receipt");
                let message = err.to_string();
                self.commit(move |s| {
                    s.job.phase = JobPhase::Failed;
                    s.job.failure = Some(message.clone());
                    s.error = Some(message);
                });
            }
        }
    }

    /// The backend recognized the content as already archived: the job is
    /// non-actionable, but the existing record is fetched for reference and
    /// an error is recorded so either surface can present it
    async fn resolve_duplicate(&self, receipt_id: &str, generation: u64) {
        let existing = self.inner.service.get_one(receipt_id).await.ok();
        if !self.poll_session_active(generation) {
            return;
        }
        self.finish_poll_session(generation);

        warn!(receipt_id = %receipt_id, "Receipt recognized as already archived");
        let err = StoreError::DuplicateDetected {
            existing_id: receipt_id.to_string(),
        };
        let message = err.to_string();
        self.commit(move |s| {
            s.job.phase = JobPhase::Duplicate;
            s.job.receipt = existing;
            s.error = Some(message);
        });
    }
}
