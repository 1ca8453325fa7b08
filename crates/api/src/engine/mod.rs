//! Completion engine services.
//!
//! Wraps the pure propagation core with the database work around it:
//! loading snapshots, persisting plans inside the caller's transaction,
//! and turning results into bus events once the transaction commits.

pub mod answer;
pub mod completion;
pub mod events;
pub mod feedback;
