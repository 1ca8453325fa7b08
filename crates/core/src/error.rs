use crate::types::DbId;

/// Domain errors raised by the completion core and its callers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The actor tried to answer a question whose prerequisite nodes are
    /// not completed yet. Carries the display names of those nodes.
    #[error("Node '{}' must be completed before answering", .0.join(", "))]
    PrerequisitesIncomplete(Vec<String>),

    /// Seed nodes handed to one propagation call span more than one map.
    #[error("Seed nodes span multiple maps: {0:?}")]
    SeedsSpanMaps(Vec<DbId>),

    /// Propagation was invoked without a resolved member identity.
    #[error("Actor identity is not resolved")]
    UnresolvedActor,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerequisites_message_lists_node_names() {
        let err = CoreError::PrerequisitesIncomplete(vec!["Intro".into(), "Basics".into()]);
        assert_eq!(
            err.to_string(),
            "Node 'Intro, Basics' must be completed before answering"
        );
    }

    #[test]
    fn seeds_span_maps_message_includes_ids() {
        let err = CoreError::SeedsSpanMaps(vec![1, 2]);
        assert!(err.to_string().contains("[1, 2]"));
    }
}
