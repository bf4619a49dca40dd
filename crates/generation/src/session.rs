//! Per-shot generation context: submission plus the single polling
//! timer.
//!
//! A [`GenerationSession`] is created when a shot context opens and
//! owns everything that context needs: the merged job list, the backend
//! handle, and at most one poll task. Polling starts when a job is
//! outstanding and stops on its own once none remain; teardown is
//! guaranteed on every exit path: [`PollHandle`] cancels on drop, and
//! the poll task holds only a weak reference to the session, so
//! dropping the last external handle ends the loop as well. A
//! reconciliation response that is in flight when the context is torn
//! down is dropped, never applied.

use std::sync::{Arc, Mutex as StdMutex, Weak};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use shotflow_core::types::EntityId;

use crate::backend::{GenerationBackend, GenerationError};
use crate::config::PollConfig;
use crate::job::{GenerationJob, JobId};
use crate::request::GenerationRequest;
use crate::tracker::JobTracker;

/// Handle to a running poll task. Cancelling is synchronous; dropping
/// the handle cancels too, so the timer cannot outlive its owner.
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the poll task. Safe to call redundantly.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The open-shot context for generation work.
pub struct GenerationSession {
    shot_id: EntityId,
    backend: Arc<dyn GenerationBackend>,
    config: PollConfig,
    tracker: Mutex<JobTracker>,
    /// Serializes reconciliation passes: a poll tick that would overlap
    /// a running reconcile is skipped, never queued behind it.
    reconcile_gate: Mutex<()>,
    poll: StdMutex<Option<PollHandle>>,
    /// Handed to the poll task so the loop cannot keep the session
    /// alive.
    weak_self: Weak<GenerationSession>,
}

impl GenerationSession {
    pub fn new(
        shot_id: EntityId,
        backend: Arc<dyn GenerationBackend>,
        config: PollConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            shot_id,
            backend,
            config,
            tracker: Mutex::new(JobTracker::new()),
            reconcile_gate: Mutex::new(()),
            poll: StdMutex::new(None),
            weak_self: weak_self.clone(),
        })
    }

    pub fn shot_id(&self) -> EntityId {
        self.shot_id
    }

    /// The merged job list, most recent first.
    pub async fn jobs(&self) -> Vec<GenerationJob> {
        self.tracker.lock().await.jobs().to_vec()
    }

    pub async fn has_pending(&self) -> bool {
        self.tracker.lock().await.has_pending()
    }

    /// Submit a generation request.
    ///
    /// The job appears in the merged list immediately with a temporary
    /// id. On dispatch success the entry is re-keyed to the backend's
    /// id and polling is ensured; on dispatch failure the entry is
    /// removed and the error surfaced; there is no automatic retry.
    pub async fn submit(&self, request: GenerationRequest) -> Result<JobId, GenerationError> {
        request.validate()?;

        let job = GenerationJob::pending(self.shot_id, &request);
        let local_id = job.id.clone();
        self.tracker.lock().await.insert_optimistic(job);

        match self.backend.dispatch(self.shot_id, &request).await {
            Ok(receipt) => {
                let mut current_id = local_id.clone();
                if let Some(remote) = receipt.job_id {
                    if let Some(rekeyed) =
                        self.tracker.lock().await.rekey(&local_id, remote)
                    {
                        current_id = rekeyed;
                    }
                }

                // Pick up the backend's view right away; a failure here
                // is non-fatal, the optimistic entry stands.
                if let Err(e) = self.reconcile().await {
                    tracing::warn!(
                        shot_id = %self.shot_id,
                        error = %e,
                        "Post-dispatch refresh failed, keeping optimistic entry",
                    );
                }

                self.ensure_polling();
                Ok(current_id)
            }
            Err(e) => {
                self.tracker.lock().await.remove(&local_id);
                tracing::warn!(
                    shot_id = %self.shot_id,
                    error = %e,
                    "Generation dispatch failed",
                );
                Err(e)
            }
        }
    }

    /// Re-submit a fresh job using a failed (or finished) job's stored
    /// request settings. The original job id is untouched.
    pub async fn retry_from(&self, job_id: &JobId) -> Result<JobId, GenerationError> {
        let request = {
            let tracker = self.tracker.lock().await;
            let job = tracker
                .jobs()
                .iter()
                .find(|j| &j.id == job_id)
                .ok_or_else(|| GenerationError::JobNotFound(job_id.clone()))?;
            job.request
                .clone()
                .ok_or_else(|| GenerationError::NoRequestSnapshot(job_id.clone()))?
        };
        self.submit(request).await
    }

    /// Run one reconciliation pass now. Returns whether jobs are still
    /// pending afterward.
    pub async fn refresh(&self) -> Result<bool, GenerationError> {
        self.reconcile().await
    }

    /// Start the poll task if it is not already running. Idempotent.
    pub fn ensure_polling(&self) {
        let mut slot = self.poll.lock().expect("poll slot lock poisoned");
        if let Some(handle) = slot.as_ref() {
            if !handle.is_finished() {
                return;
            }
        }

        let cancel = CancellationToken::new();
        let child = cancel.clone();
        let weak = self.weak_self.clone();
        let period = self.config.interval;
        let shot_id = self.shot_id;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the
            // first reconcile happens one full interval after start.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                // The context may have been dropped between ticks.
                let Some(session) = weak.upgrade() else { break };

                tokio::select! {
                    _ = child.cancelled() => break,
                    result = session.try_reconcile() => match result {
                        // Nothing pending: the timer's work is done.
                        Ok(Some(false)) => break,
                        // Still pending, or tick skipped behind a
                        // running reconcile.
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(
                                shot_id = %shot_id,
                                error = %e,
                                "Poll reconcile failed, keeping previous job list",
                            );
                        }
                    }
                }
            }

            tracing::debug!(shot_id = %shot_id, "Polling stopped");
        });

        *slot = Some(PollHandle { cancel, task });
    }

    /// Synchronously cancel the poll task. Safe to call redundantly;
    /// must be called on context teardown (dropping the session works
    /// too).
    pub fn stop_polling(&self) {
        if let Some(handle) = self.poll.lock().expect("poll slot lock poisoned").take() {
            handle.cancel();
        }
    }

    /// Whether a poll task is currently live.
    pub fn is_polling(&self) -> bool {
        self.poll
            .lock()
            .expect("poll slot lock poisoned")
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    // ---- private helpers ----

    /// Fetch the authoritative snapshot and merge it, serialized behind
    /// the reconcile gate. On fetch failure the previous merged list is
    /// retained unchanged.
    async fn reconcile(&self) -> Result<bool, GenerationError> {
        let _gate = self.reconcile_gate.lock().await;
        let snapshot = self.backend.list(self.shot_id).await?;
        let mut tracker = self.tracker.lock().await;
        tracker.apply_snapshot(snapshot);
        Ok(tracker.has_pending())
    }

    /// Like [`reconcile`](Self::reconcile), but skips instead of
    /// waiting when another reconcile is already running. `Ok(None)`
    /// means the tick was skipped.
    async fn try_reconcile(&self) -> Result<Option<bool>, GenerationError> {
        let _gate = match self.reconcile_gate.try_lock() {
            Ok(gate) => gate,
            Err(_) => return Ok(None),
        };
        let snapshot = self.backend.list(self.shot_id).await?;
        let mut tracker = self.tracker.lock().await;
        tracker.apply_snapshot(snapshot);
        Ok(Some(tracker.has_pending()))
    }
}
