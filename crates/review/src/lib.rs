//! The multi-role approval state machine.
//!
//! [`ReviewService`] owns every review transition: vote casting with
//! the activation rule (either tier's positive vote makes the version
//! active and publishes it externally), feedback comments, the
//! supervisor tier's approve/reject, and version creation. The
//! external publish seam is the [`ArtifactSync`](sync::ArtifactSync)
//! trait; its failure is surfaced as a warning on the outcome, never a
//! rollback.

pub mod error;
pub mod service;
pub mod sync;

pub use error::{ReviewError, ReviewResult};
pub use service::{ReviewService, SyncStatus, VoteOutcome};
pub use sync::{ArtifactSync, SyncError};
