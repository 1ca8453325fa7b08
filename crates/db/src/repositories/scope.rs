//! SQL fragment restricting progress rows to one actor scope.

use trailmap_core::actor::ActorScope;

/// `WHERE` fragment matching rows of `alias` visible to an actor scope.
///
/// `$play` binds `scope.map_play_id()` and `$member` binds
/// `scope.member_id()`. A play session sees every row recorded by any seat
/// of the same play; a solo member sees only its own rows outside any play.
pub(crate) fn scope_clause(alias: &str, play_param: usize, member_param: usize) -> String {
    format!(
        "(({alias}.map_play_member_id IN \
              (SELECT id FROM map_play_members WHERE map_play_id = ${play_param})) \
          OR (${play_param}::BIGINT IS NULL \
              AND {alias}.member_id = ${member_param} \
              AND {alias}.map_play_member_id IS NULL))"
    )
}

/// Bind values for [`scope_clause`], in `(play, member)` order.
pub(crate) fn scope_binds(scope: &ActorScope) -> (Option<i64>, i64) {
    (scope.map_play_id(), scope.member_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_uses_given_placeholders() {
        let clause = scope_clause("ap", 2, 3);
        assert!(clause.contains("map_play_id = $2"));
        assert!(clause.contains("ap.member_id = $3"));
        assert!(clause.contains("$2::BIGINT IS NULL"));
    }

    #[test]
    fn solo_scope_binds_no_play() {
        let (play, member) = scope_binds(&ActorScope::Member { member_id: 4 });
        assert_eq!(play, None);
        assert_eq!(member, 4);
    }
}
