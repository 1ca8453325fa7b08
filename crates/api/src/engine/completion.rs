//! Persisted node completion.
//!
//! [`NodeCompletionService::process_nodes_completion`] runs propagation for
//! a set of seed nodes and writes the resulting progress and history rows
//! on the caller's connection. It never commits; the caller owns the
//! transaction and publishes events after committing.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use sqlx::PgConnection;
use trailmap_core::actor::{Actor, ActorScope};
use trailmap_core::error::CoreError;
use trailmap_core::propagation::propagate;
use trailmap_core::types::DbId;
use trailmap_db::models::graph::Arrow;
use trailmap_db::models::map::Node;
use trailmap_db::models::progress::{ArrowProgress, NodeCompletedHistory};
use trailmap_db::repositories::{
    ArrowProgressRepo, ArrowRepo, GraphSnapshotRepo, NodeHistoryRepo, NodeRepo, ScopeLockRepo,
};

use crate::error::AppError;

/// Rows written by one propagation call.
#[derive(Debug, Default)]
pub struct CompletionResult {
    pub new_arrow_progresses: Vec<ArrowProgress>,
    pub new_completed_node_histories: Vec<NodeCompletedHistory>,
    /// Nodes in `new_completed_node_histories` that the scope had already
    /// completed through another rule before this call.
    pub already_completed_node_ids: HashSet<DbId>,
    /// Nodes that gained an incoming path from a newly completed node and
    /// are not completed themselves.
    pub activated_node_ids: BTreeSet<DbId>,
}

impl CompletionResult {
    pub fn is_empty(&self) -> bool {
        self.new_arrow_progresses.is_empty() && self.new_completed_node_histories.is_empty()
    }

    /// Distinct ids of nodes that gained a history row, in insertion order.
    pub fn completed_node_ids(&self) -> Vec<DbId> {
        let mut seen = HashSet::new();
        self.new_completed_node_histories
            .iter()
            .map(|h| h.node_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Outcome of resolving the arrow behind a correctly answered question.
#[derive(Debug, Default)]
pub struct ArrowResolution {
    /// The progress row, when this call created it.
    pub created_progress: Option<ArrowProgress>,
    pub completion: CompletionResult,
}

impl ArrowResolution {
    /// Progress rows this resolution inserted, including the answered arrow.
    pub fn new_arrow_progress_count(&self) -> usize {
        usize::from(self.created_progress.is_some()) + self.completion.new_arrow_progresses.len()
    }
}

pub struct NodeCompletionService;

impl NodeCompletionService {
    /// Propagate completion from `nodes` for `actor` and persist the result.
    ///
    /// Empty seeds yield an empty result. Seeds must all belong to one map
    /// and the actor must resolve to a scope. Concurrent calls for the same
    /// scope are serialised by a transaction-level advisory lock.
    pub async fn process_nodes_completion(
        conn: &mut PgConnection,
        actor: &Actor,
        nodes: &[Node],
    ) -> Result<CompletionResult, AppError> {
        let Some(first) = nodes.first() else {
            return Ok(CompletionResult::default());
        };
        let map_id = first.map_id;

        let map_ids: BTreeSet<DbId> = nodes.iter().map(|n| n.map_id).collect();
        if map_ids.len() > 1 {
            return Err(CoreError::SeedsSpanMaps(map_ids.into_iter().collect()).into());
        }
        let scope = actor.scope().ok_or(CoreError::UnresolvedActor)?;

        ScopeLockRepo::lock(&mut *conn, &scope).await?;

        let mut snapshot = GraphSnapshotRepo::load(&mut *conn, map_id, &scope).await?;
        let previously_completed = snapshot.completed_node_ids.clone();
        let seed_ids: Vec<DbId> = nodes.iter().map(|n| n.id).collect();
        let plan = propagate(&mut snapshot, &seed_ids, &scope, Utc::now());

        for history in &plan.new_completed_node_histories {
            tracing::debug!(
                map_id,
                node_id = history.node_id,
                rule_id = history.node_complete_rule_id,
                "Node unlocked"
            );
        }

        let new_arrow_progresses =
            ArrowProgressRepo::bulk_insert(&mut *conn, &plan.new_arrow_progresses).await?;
        let new_completed_node_histories =
            NodeHistoryRepo::bulk_insert(&mut *conn, &plan.new_completed_node_histories)
                .await?;

        let already_completed_node_ids = new_completed_node_histories
            .iter()
            .map(|h| h.node_id)
            .filter(|id| previously_completed.contains(id))
            .collect();

        tracing::info!(
            map_id,
            member_id = scope.member_id(),
            map_play_id = ?scope.map_play_id(),
            seeds = seed_ids.len(),
            arrow_progresses = new_arrow_progresses.len(),
            node_histories = new_completed_node_histories.len(),
            activated = plan.activated_node_ids.len(),
            "Processed node completion"
        );

        Ok(CompletionResult {
            new_arrow_progresses,
            new_completed_node_histories,
            already_completed_node_ids,
            activated_node_ids: plan.activated_node_ids,
        })
    }

    /// Resolve `arrow` for the scope and propagate if its rule is complete.
    ///
    /// An arrow the scope had already resolved is left alone and nothing
    /// propagates. Otherwise, once every arrow of the arrow's rule is
    /// resolved, completion runs seeded with the arrow's start node.
    pub async fn resolve_arrow(
        conn: &mut PgConnection,
        arrow: &Arrow,
        scope: &ActorScope,
    ) -> Result<ArrowResolution, AppError> {
        ScopeLockRepo::lock(&mut *conn, scope).await?;

        let (progress, created) = ArrowProgressRepo::get_or_create_resolved(
            &mut *conn,
            arrow.map_id,
            arrow.id,
            scope,
            Utc::now(),
        )
        .await?;
        if !created {
            tracing::debug!(arrow_id = arrow.id, "Arrow already resolved, skipping propagation");
            return Ok(ArrowResolution::default());
        }

        let rule_arrow_ids = ArrowRepo::list_ids_by_rule(&mut *conn, arrow.node_complete_rule_id)
            .await?;
        let resolved = ArrowProgressRepo::resolved_among(&mut *conn, &rule_arrow_ids, scope)
            .await?;
        let rule_complete = !rule_arrow_ids.is_empty() && resolved.len() == rule_arrow_ids.len();

        let completion = if rule_complete {
            let start_node = Self::start_node(&mut *conn, arrow).await?;
            Self::process_nodes_completion(conn, &Actor::from(*scope), &[start_node]).await?
        } else {
            tracing::debug!(
                arrow_id = arrow.id,
                rule_id = arrow.node_complete_rule_id,
                resolved = resolved.len(),
                total = rule_arrow_ids.len(),
                "Rule not yet satisfied"
            );
            CompletionResult::default()
        };

        Ok(ArrowResolution {
            created_progress: Some(progress),
            completion,
        })
    }

    /// Resolve `arrow` after a reviewer accepted its answer.
    ///
    /// Unlike [`Self::resolve_arrow`], completion always runs seeded with
    /// the arrow's start node, whether or not the arrow was resolved before
    /// and whether or not its rule is complete.
    pub async fn accept_arrow(
        conn: &mut PgConnection,
        arrow: &Arrow,
        scope: &ActorScope,
    ) -> Result<ArrowResolution, AppError> {
        ScopeLockRepo::lock(&mut *conn, scope).await?;

        let (progress, created) = ArrowProgressRepo::get_or_create_resolved(
            &mut *conn,
            arrow.map_id,
            arrow.id,
            scope,
            Utc::now(),
        )
        .await?;

        let start_node = Self::start_node(&mut *conn, arrow).await?;
        let completion =
            Self::process_nodes_completion(conn, &Actor::from(*scope), &[start_node]).await?;

        Ok(ArrowResolution {
            created_progress: created.then_some(progress),
            completion,
        })
    }

    async fn start_node(conn: &mut PgConnection, arrow: &Arrow) -> Result<Node, AppError> {
        NodeRepo::find_by_id(&mut *conn, arrow.start_node_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Node",
                    id: arrow.start_node_id,
                }
                .into()
            })
    }
}
