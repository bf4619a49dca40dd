//! Asynchronous image-generation job lifecycle.
//!
//! A shot's generation jobs are created locally before the backend has
//! assigned them a durable identity, then confirmed and completed by
//! periodic authoritative snapshots. This crate provides:
//!
//! - [`request`] — the tagged [`GenerationRequest`](request::GenerationRequest)
//!   union covering every generation mode.
//! - [`job`] — [`GenerationJob`](job::GenerationJob) and the two-variant
//!   [`JobId`](job::JobId) (local temp vs. backend-durable).
//! - [`tracker`] — [`JobTracker`](tracker::JobTracker), the optimistic
//!   merge of local and snapshot state.
//! - [`session`] — [`GenerationSession`](session::GenerationSession),
//!   the per-open-shot context owning submission and the single polling
//!   timer, with guaranteed teardown via [`PollHandle`](session::PollHandle).
//! - [`backend`] — the [`GenerationBackend`](backend::GenerationBackend)
//!   collaborator contract.
//! - [`client`] — [`HttpGenerationBackend`](client::HttpGenerationBackend),
//!   the production HTTP implementation.
//! - [`config`] — environment-driven polling and backend configuration.

pub mod backend;
pub mod client;
pub mod config;
pub mod job;
pub mod request;
pub mod session;
pub mod tracker;

pub use backend::{DispatchReceipt, GenerationBackend, GenerationError};
pub use client::HttpGenerationBackend;
pub use config::{BackendConfig, PollConfig};
pub use job::{GenerationJob, JobId, JobStatus};
pub use request::{GenerationParams, GenerationRequest, ReferenceImage};
pub use session::{GenerationSession, PollHandle};
pub use tracker::JobTracker;
