//! Entity models and collaborator contracts for the shot review
//! pipeline.
//!
//! Persistence itself is an external collaborator: this crate defines
//! the entity shapes ([`models`]), the async traits the coordination
//! layer calls ([`traits`]), the [`StoreError`](error::StoreError)
//! taxonomy, and [`MemoryStore`](memory::MemoryStore), an in-memory
//! implementation backing tests and single-process embedders.

pub mod error;
pub mod memory;
pub mod models;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{CatalogStore, NotificationStore, ReviewStore, ShotStore, VersionStore};
