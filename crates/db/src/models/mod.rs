//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, where the API creates rows

pub mod answer;
pub mod graph;
pub mod map;
pub mod play;
pub mod progress;
pub mod question;
