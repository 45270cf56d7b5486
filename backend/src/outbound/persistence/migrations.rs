//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::UserPersistenceError;

/// Migrations from `backend/migrations`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a short-lived synchronous connection.
///
/// Blocks the calling thread; async callers should use
/// `tokio::task::spawn_blocking`.
///
/// # Errors
///
/// Returns `Connection` when the database is unreachable and `Query` when a
/// migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, UserPersistenceError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| UserPersistenceError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| UserPersistenceError::query(format!("migration failed: {err}")))?;
    info!(count = applied.len(), "database migrations applied");
    Ok(applied.len())
}
