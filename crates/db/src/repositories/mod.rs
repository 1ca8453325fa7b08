//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods.
//! Single-statement methods accept any Postgres executor (`&PgPool` or a
//! transaction's `&mut PgConnection`); methods issuing several statements
//! take `&mut PgConnection` so they can join the caller's transaction.

pub mod arrow_progress_repo;
pub mod arrow_repo;
pub mod graph_snapshot_repo;
pub mod map_play_member_repo;
pub mod map_repo;
pub mod node_history_repo;
pub mod node_repo;
pub mod question_repo;
pub mod rule_repo;
mod scope;
pub mod scope_lock_repo;
pub mod user_answer_repo;

pub use arrow_progress_repo::ArrowProgressRepo;
pub use arrow_repo::ArrowRepo;
pub use graph_snapshot_repo::GraphSnapshotRepo;
pub use map_play_member_repo::MapPlayMemberRepo;
pub use map_repo::MapRepo;
pub use node_history_repo::NodeHistoryRepo;
pub use node_repo::NodeRepo;
pub use question_repo::QuestionRepo;
pub use rule_repo::RuleRepo;
pub use scope_lock_repo::ScopeLockRepo;
pub use user_answer_repo::UserAnswerRepo;
