//! Repository for the `node_completed_histories` table.
//!
//! Rows are append-only, one per `(node, rule, member, seat)`.

use sqlx::PgExecutor;
use trailmap_core::actor::ActorScope;
use trailmap_core::propagation::NewNodeCompletedHistory;
use trailmap_core::types::{DbId, Timestamp};

use super::scope::{scope_binds, scope_clause};
use crate::models::progress::NodeCompletedHistory;

const COLUMNS: &str = "id, map_id, node_id, node_complete_rule_id, member_id, \
    map_play_member_id, completed_at, created_at, updated_at";

pub struct NodeHistoryRepo;

impl NodeHistoryRepo {
    /// Bulk-insert planned rows in one statement, skipping existing ones.
    /// Returns only the rows actually inserted.
    pub async fn bulk_insert<'e>(
        executor: impl PgExecutor<'e>,
        rows: &[NewNodeCompletedHistory],
    ) -> Result<Vec<NodeCompletedHistory>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let map_ids: Vec<DbId> = rows.iter().map(|r| r.map_id).collect();
        let node_ids: Vec<DbId> = rows.iter().map(|r| r.node_id).collect();
        let rule_ids: Vec<DbId> = rows.iter().map(|r| r.node_complete_rule_id).collect();
        let member_ids: Vec<DbId> = rows.iter().map(|r| r.member_id).collect();
        let seat_ids: Vec<Option<DbId>> = rows.iter().map(|r| r.map_play_member_id).collect();
        let completed_ats: Vec<Timestamp> = rows.iter().map(|r| r.completed_at).collect();

        let query = format!(
            "INSERT INTO node_completed_histories
                (map_id, node_id, node_complete_rule_id, member_id, map_play_member_id, completed_at)
             SELECT t.map_id, t.node_id, t.rule_id, t.member_id, t.map_play_member_id, t.completed_at
             FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::BIGINT[], $4::BIGINT[], $5::BIGINT[],
                         $6::TIMESTAMPTZ[])
                 AS t(map_id, node_id, rule_id, member_id, map_play_member_id, completed_at)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NodeCompletedHistory>(&query)
            .bind(&map_ids)
            .bind(&node_ids)
            .bind(&rule_ids)
            .bind(&member_ids)
            .bind(&seat_ids)
            .bind(&completed_ats)
            .fetch_all(executor)
            .await
    }

    /// Distinct `(node_id, rule_id)` pairs of a map recorded for the scope.
    pub async fn completed_pairs<'e>(
        executor: impl PgExecutor<'e>,
        map_id: DbId,
        scope: &ActorScope,
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT h.node_id, h.node_complete_rule_id FROM node_completed_histories h
             WHERE h.map_id = $1 AND {}
             ORDER BY h.node_id, h.node_complete_rule_id",
            scope_clause("h", 2, 3)
        );
        let (play, member) = scope_binds(scope);
        sqlx::query_as::<_, (DbId, DbId)>(&query)
            .bind(map_id)
            .bind(play)
            .bind(member)
            .fetch_all(executor)
            .await
    }

    /// Distinct node ids of a map completed by the scope.
    pub async fn completed_node_ids<'e>(
        executor: impl PgExecutor<'e>,
        map_id: DbId,
        scope: &ActorScope,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT h.node_id FROM node_completed_histories h
             WHERE h.map_id = $1 AND {}
             ORDER BY h.node_id",
            scope_clause("h", 2, 3)
        );
        let (play, member) = scope_binds(scope);
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(map_id)
            .bind(play)
            .bind(member)
            .fetch_all(executor)
            .await
    }
}
