//! Request handlers.
//!
//! Handlers extract the authenticated member, delegate to the engine
//! services or repositories, and wrap results in [`crate::response::DataResponse`].

pub mod answers;
pub mod feedback;
pub mod maps;
pub mod nodes;
