//! Transaction-scoped advisory locks keyed by actor scope.

use sqlx::PgExecutor;
use trailmap_core::actor::ActorScope;

pub struct ScopeLockRepo;

impl ScopeLockRepo {
    /// Block until this transaction holds the scope's advisory lock.
    ///
    /// Released automatically at commit or rollback. Re-acquiring within
    /// the same transaction does not block.
    pub async fn lock<'e>(
        executor: impl PgExecutor<'e>,
        scope: &ActorScope,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(scope.lock_key())
            .execute(executor)
            .await?;
        Ok(())
    }
}
