//! Entity models shared across the workspace.

pub mod catalog;
pub mod notification;
pub mod review;
pub mod shot;
pub mod version;

pub use catalog::{Project, Scene, UserProfile};
pub use notification::{NewNotification, Notification};
pub use review::Review;
pub use shot::{NewShot, Shot};
pub use version::{NewVersion, Version};
