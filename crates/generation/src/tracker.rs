//! Optimistic merge of local and snapshot job state.
//!
//! [`JobTracker`] presents a single consistent job list for a shot even
//! though entries are born locally (before the backend knows them) and
//! later confirmed by authoritative snapshots. The merge rule guards
//! against the race where a snapshot taken just after submission does
//! not yet contain the new job.

use std::collections::{HashMap, HashSet};

use crate::job::{GenerationJob, JobId, JobStatus};

/// The merged job list for one shot context.
///
/// Single-writer: the owning session serializes all mutation.
#[derive(Debug, Default)]
pub struct JobTracker {
    jobs: Vec<GenerationJob>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The merged view, most recent first.
    pub fn jobs(&self) -> &[GenerationJob] {
        &self.jobs
    }

    /// Prepend a just-submitted job ahead of everything else.
    pub fn insert_optimistic(&mut self, job: GenerationJob) {
        self.jobs.insert(0, job);
    }

    /// Swap a local id for the backend-assigned one, in place. Returns
    /// the new id, or `None` if the entry is gone (e.g. already removed
    /// after a dispatch failure).
    pub fn rekey(&mut self, from: &JobId, remote_id: impl Into<String>) -> Option<JobId> {
        let remote = JobId::remote(remote_id);
        let job = self.jobs.iter_mut().find(|j| &j.id == from)?;
        job.id = remote.clone();
        Some(remote)
    }

    /// Drop an entry (dispatch failed; the job never existed backend-side).
    pub fn remove(&mut self, id: &JobId) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|j| &j.id != id);
        self.jobs.len() < before
    }

    /// Merge an authoritative snapshot into the local list.
    ///
    /// Locally-held `Pending` jobs absent from the snapshot have not
    /// propagated backend-side yet; they are preserved and presented
    /// ahead of the snapshot. Everything else is replaced by the
    /// snapshot. The result is de-duplicated by id (snapshot wins) and
    /// ordered by `created_at` descending.
    pub fn apply_snapshot(&mut self, snapshot: Vec<GenerationJob>) {
        let snapshot_ids: HashSet<JobId> = snapshot.iter().map(|j| j.id.clone()).collect();
        let missing_pending: Vec<GenerationJob> = self
            .jobs
            .iter()
            .filter(|j| j.is_pending() && !snapshot_ids.contains(&j.id))
            .cloned()
            .collect();

        if missing_pending.is_empty() {
            self.jobs = snapshot;
            return;
        }

        let mut by_id: HashMap<JobId, GenerationJob> = HashMap::new();
        for job in missing_pending.into_iter().chain(snapshot) {
            by_id.insert(job.id.clone(), job);
        }
        let mut merged: Vec<GenerationJob> = by_id.into_values().collect();
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.jobs = merged;
    }

    pub fn has_pending(&self) -> bool {
        self.jobs.iter().any(|j| j.status == JobStatus::Pending)
    }
}
