//! Scene restructuring: the dense shot ordering.
//!
//! [`SequenceService`] keeps each scene's live shots on a contiguous
//! `0..N-1` sequence through append, insert, reorder, soft delete, and
//! restore, and regenerates the derived `Shot_{n}` display names after
//! every structural change.

pub mod error;
pub mod service;

pub use error::{SequenceError, SequenceResult};
pub use service::SequenceService;
