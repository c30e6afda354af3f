//! Connection pool management for SQLite via r2d2.

use bw_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Open the post/book database at `db_path`, creating it and its tables on
/// first use.
///
/// Connections run in WAL mode. Foreign keys stay off: the `*_id` columns on
/// `books` are plain integers and the demo inserts books ahead of their
/// authors.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA journal_mode = WAL;"));

    let pool = migrated(manager, db_path)?;
    tracing::debug!("Database ready at {db_path}");
    Ok(pool)
}

/// A private in-memory database with the full schema.
///
/// Every call names a fresh shared-cache database, so pools never see each
/// other's rows while connections inside one pool do.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT: AtomicU64 = AtomicU64::new(0);

    let name = format!(
        "file:bookwiki_mem_{}?mode=memory&cache=shared",
        NEXT.fetch_add(1, Ordering::Relaxed)
    );
    migrated(SqliteConnectionManager::file(&name), &name)
}

fn migrated(manager: SqliteConnectionManager, label: &str) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to open database {label}: {e}")))?;

    migrations::run_migrations(&*get_conn(&pool)?)?;
    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
