pub mod actor;
pub mod answer_validation;
pub mod error;
pub mod graph;
pub mod lookahead;
pub mod node_status;
pub mod prerequisites;
pub mod propagation;
pub mod roles;
pub mod rules;
pub mod types;
