//! Arrow and completion rule models.

use serde::Serialize;
use sqlx::FromRow;
use trailmap_core::graph::{ArrowEdge, CompletionRule};
use trailmap_core::types::{DbId, Timestamp};

/// A row from the `arrows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Arrow {
    pub id: DbId,
    pub map_id: DbId,
    pub start_node_id: DbId,
    pub node_complete_rule_id: DbId,
    pub question_id: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `node_complete_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NodeCompleteRule {
    pub id: DbId,
    pub map_id: DbId,
    pub node_id: DbId,
    pub name: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An arrow joined with its rule's target node.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ArrowEdgeRow {
    pub id: DbId,
    pub map_id: DbId,
    pub start_node_id: DbId,
    pub rule_id: DbId,
    pub target_node_id: DbId,
    pub question_id: Option<DbId>,
}

impl From<ArrowEdgeRow> for ArrowEdge {
    fn from(row: ArrowEdgeRow) -> Self {
        Self {
            id: row.id,
            map_id: row.map_id,
            start_node_id: row.start_node_id,
            rule_id: row.rule_id,
            target_node_id: row.target_node_id,
        }
    }
}

/// The key columns of a live completion rule.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CompletionRuleRow {
    pub id: DbId,
    pub map_id: DbId,
    pub node_id: DbId,
}

impl From<CompletionRuleRow> for CompletionRule {
    fn from(row: CompletionRuleRow) -> Self {
        Self {
            id: row.id,
            map_id: row.map_id,
            node_id: row.node_id,
        }
    }
}
