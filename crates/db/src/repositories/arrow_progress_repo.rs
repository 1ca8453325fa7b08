//! Repository for the `arrow_progresses` table.
//!
//! Rows are append-only. Inserts never fail on an existing
//! `(arrow, member, seat)` row: they skip it via `ON CONFLICT DO NOTHING`
//! against `uq_arrow_progresses_arrow_actor`.

use sqlx::{PgConnection, PgExecutor};
use trailmap_core::actor::ActorScope;
use trailmap_core::propagation::NewArrowProgress;
use trailmap_core::types::{DbId, Timestamp};

use super::scope::{scope_binds, scope_clause};
use crate::models::progress::ArrowProgress;

const COLUMNS: &str = "id, map_id, arrow_id, member_id, map_play_member_id, is_resolved, \
    resolved_at, created_at, updated_at";

pub struct ArrowProgressRepo;

impl ArrowProgressRepo {
    /// The earliest resolved progress for an arrow visible to the scope.
    pub async fn find_resolved<'e>(
        executor: impl PgExecutor<'e>,
        arrow_id: DbId,
        scope: &ActorScope,
    ) -> Result<Option<ArrowProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM arrow_progresses ap
             WHERE ap.arrow_id = $1 AND ap.is_resolved AND {}
             ORDER BY ap.id
             LIMIT 1",
            scope_clause("ap", 2, 3)
        );
        let (play, member) = scope_binds(scope);
        sqlx::query_as::<_, ArrowProgress>(&query)
            .bind(arrow_id)
            .bind(play)
            .bind(member)
            .fetch_optional(executor)
            .await
    }

    /// Insert one resolved progress row. Returns `None` if it already exists.
    pub async fn insert_resolved<'e>(
        executor: impl PgExecutor<'e>,
        map_id: DbId,
        arrow_id: DbId,
        scope: &ActorScope,
        resolved_at: Timestamp,
    ) -> Result<Option<ArrowProgress>, sqlx::Error> {
        let query = format!(
            "INSERT INTO arrow_progresses
                (map_id, arrow_id, member_id, map_play_member_id, is_resolved, resolved_at)
             VALUES ($1, $2, $3, $4, TRUE, $5)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArrowProgress>(&query)
            .bind(map_id)
            .bind(arrow_id)
            .bind(scope.member_id())
            .bind(scope.map_play_member_id())
            .bind(resolved_at)
            .fetch_optional(executor)
            .await
    }

    /// Return the scope's resolved progress for an arrow, creating it if
    /// needed. The flag is `true` when this call inserted the row.
    pub async fn get_or_create_resolved(
        conn: &mut PgConnection,
        map_id: DbId,
        arrow_id: DbId,
        scope: &ActorScope,
        resolved_at: Timestamp,
    ) -> Result<(ArrowProgress, bool), sqlx::Error> {
        if let Some(existing) = Self::find_resolved(&mut *conn, arrow_id, scope).await? {
            return Ok((existing, false));
        }
        if let Some(created) =
            Self::insert_resolved(&mut *conn, map_id, arrow_id, scope, resolved_at).await?
        {
            return Ok((created, true));
        }
        // Lost a race against a concurrent insert for the same seat.
        let existing = Self::find_resolved(&mut *conn, arrow_id, scope)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((existing, false))
    }

    /// Bulk-insert planned rows in one statement, skipping existing ones.
    /// Returns only the rows actually inserted.
    pub async fn bulk_insert<'e>(
        executor: impl PgExecutor<'e>,
        rows: &[NewArrowProgress],
    ) -> Result<Vec<ArrowProgress>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let map_ids: Vec<DbId> = rows.iter().map(|r| r.map_id).collect();
        let arrow_ids: Vec<DbId> = rows.iter().map(|r| r.arrow_id).collect();
        let member_ids: Vec<DbId> = rows.iter().map(|r| r.member_id).collect();
        let seat_ids: Vec<Option<DbId>> = rows.iter().map(|r| r.map_play_member_id).collect();
        let resolved_ats: Vec<Timestamp> = rows.iter().map(|r| r.resolved_at).collect();

        let query = format!(
            "INSERT INTO arrow_progresses
                (map_id, arrow_id, member_id, map_play_member_id, is_resolved, resolved_at)
             SELECT t.map_id, t.arrow_id, t.member_id, t.map_play_member_id, TRUE, t.resolved_at
             FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::BIGINT[], $4::BIGINT[], $5::TIMESTAMPTZ[])
                 AS t(map_id, arrow_id, member_id, map_play_member_id, resolved_at)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArrowProgress>(&query)
            .bind(&map_ids)
            .bind(&arrow_ids)
            .bind(&member_ids)
            .bind(&seat_ids)
            .bind(&resolved_ats)
            .fetch_all(executor)
            .await
    }

    /// Distinct resolved arrow ids of a map visible to the scope.
    pub async fn resolved_arrow_ids<'e>(
        executor: impl PgExecutor<'e>,
        map_id: DbId,
        scope: &ActorScope,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ap.arrow_id FROM arrow_progresses ap
             WHERE ap.map_id = $1 AND ap.is_resolved AND {}
             ORDER BY ap.arrow_id",
            scope_clause("ap", 2, 3)
        );
        let (play, member) = scope_binds(scope);
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(map_id)
            .bind(play)
            .bind(member)
            .fetch_all(executor)
            .await
    }

    /// The subset of `arrow_ids` the scope has resolved.
    pub async fn resolved_among<'e>(
        executor: impl PgExecutor<'e>,
        arrow_ids: &[DbId],
        scope: &ActorScope,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if arrow_ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT DISTINCT ap.arrow_id FROM arrow_progresses ap
             WHERE ap.arrow_id = ANY($1) AND ap.is_resolved AND {}
             ORDER BY ap.arrow_id",
            scope_clause("ap", 2, 3)
        );
        let (play, member) = scope_binds(scope);
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(arrow_ids)
            .bind(play)
            .bind(member)
            .fetch_all(executor)
            .await
    }
}
