//! Actor identity used to scope progress and completion history.
//!
//! Progress is canonically scoped to a group play session: every member
//! seated in the same `map_play` shares resolved arrows and completed
//! nodes, while new rows are attributed to the member who caused them.
//! A bare member without a play session is the degenerate case of a
//! single implicit session.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Raw identity as received from the caller. Any part may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub member_id: Option<DbId>,
    pub map_play_member_id: Option<DbId>,
    pub map_play_id: Option<DbId>,
}

/// A resolved identity scope. Only constructed through [`Actor::scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ActorScope {
    /// Progress owned by one member with no play session.
    Member { member_id: DbId },
    /// Progress shared by all members of one play session.
    PlaySession {
        member_id: DbId,
        map_play_member_id: DbId,
        map_play_id: DbId,
    },
}

impl Actor {
    /// A member playing alone, outside any play session.
    pub fn member(member_id: DbId) -> Self {
        Self {
            member_id: Some(member_id),
            map_play_member_id: None,
            map_play_id: None,
        }
    }

    /// A member seated in a play session.
    pub fn play_session(member_id: DbId, map_play_member_id: DbId, map_play_id: DbId) -> Self {
        Self {
            member_id: Some(member_id),
            map_play_member_id: Some(map_play_member_id),
            map_play_id: Some(map_play_id),
        }
    }

    /// Resolve the identity into a scope.
    ///
    /// Returns `None` when there is no member, or when only half of the
    /// play-session identity is present.
    pub fn scope(&self) -> Option<ActorScope> {
        let member_id = self.member_id?;
        match (self.map_play_member_id, self.map_play_id) {
            (Some(map_play_member_id), Some(map_play_id)) => Some(ActorScope::PlaySession {
                member_id,
                map_play_member_id,
                map_play_id,
            }),
            (None, None) => Some(ActorScope::Member { member_id }),
            _ => None,
        }
    }
}

impl ActorScope {
    pub fn member_id(&self) -> DbId {
        match *self {
            Self::Member { member_id } | Self::PlaySession { member_id, .. } => member_id,
        }
    }

    pub fn map_play_member_id(&self) -> Option<DbId> {
        match *self {
            Self::Member { .. } => None,
            Self::PlaySession {
                map_play_member_id, ..
            } => Some(map_play_member_id),
        }
    }

    pub fn map_play_id(&self) -> Option<DbId> {
        match *self {
            Self::Member { .. } => None,
            Self::PlaySession { map_play_id, .. } => Some(map_play_id),
        }
    }

    /// Key for a transaction-level advisory lock serialising propagation
    /// within this scope.
    ///
    /// Play sessions lock on the (positive) play id since all seated
    /// members share progress; solo members lock on the negated member id
    /// so the two key spaces never collide.
    pub fn lock_key(&self) -> i64 {
        match *self {
            Self::Member { member_id } => -member_id,
            Self::PlaySession { map_play_id, .. } => map_play_id,
        }
    }
}

impl From<ActorScope> for Actor {
    fn from(scope: ActorScope) -> Self {
        Self {
            member_id: Some(scope.member_id()),
            map_play_member_id: scope.map_play_member_id(),
            map_play_id: scope.map_play_id(),
        }
    }
}
