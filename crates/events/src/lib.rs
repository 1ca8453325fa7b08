//! trailmap event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`MapEvent`]: the domain event envelope for answers and completions.
//! - [`EventLogger`]: background subscriber that traces every event.
//!
//! Delivery to members (push, email) subscribes to the same bus and lives
//! outside this workspace.

pub mod bus;
pub mod logger;
pub mod types;

pub use bus::{EventBus, MapEvent};
pub use logger::EventLogger;
