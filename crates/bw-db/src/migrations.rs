//! Schema for the post and book tables.
//!
//! Each schema version is an embedded SQL batch; `schema_migrations`
//! records which versions a database already has.

use bw_core::{Error, Result};
use rusqlite::Connection;

/// V1: posts, books and the book lookup tables.
///
/// `IF NOT EXISTS` keeps this safe against a database file that already
/// carries the tables from an earlier run.
const V1_INITIAL: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    post_id INTEGER PRIMARY KEY AUTOINCREMENT,
    created INTEGER NOT NULL,
    title   TEXT NOT NULL,
    body    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    book_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    author_id    INTEGER NOT NULL,
    isbn         TEXT NOT NULL,
    pubdate      INTEGER NOT NULL,
    edition      INTEGER NOT NULL,
    isfiction    INTEGER NOT NULL,
    genre_id     INTEGER NOT NULL,
    publisher_id INTEGER NOT NULL,
    series_id    INTEGER NOT NULL,
    language_id  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS authors (
    author_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    firstname  TEXT NOT NULL,
    lastname   TEXT NOT NULL,
    pseudonyms TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS genres (
    genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS publishers (
    publisher_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS series (
    series_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS languages (
    language_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL
);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL)];

/// Bring the schema on `conn` up to date.
///
/// Versions already listed in `schema_migrations` are skipped; each pending
/// one runs in its own transaction together with its bookkeeping row.
/// Returns how many were applied.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    let done = applied_versions(conn)?;
    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|(version, _)| !done.contains(version))
        .collect();

    for &&(version, sql) in &pending {
        apply(conn, version, sql)?;
        tracing::info!("Applied schema V{version}");
    }

    Ok(pending.len())
}

fn applied_versions(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare("SELECT version FROM schema_migrations")
        .map_err(|e| Error::database(e.to_string()))?;
    let versions = stmt
        .query_map([], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<i64>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(versions)
}

fn apply(conn: &Connection, version: i64, sql: &str) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    tx.execute_batch(sql)
        .and_then(|()| {
            tx.execute(
                "INSERT INTO schema_migrations (version) VALUES (?1)",
                [version],
            )
        })
        .map_err(|e| Error::database(format!("Schema V{version} failed: {e}")))?;

    tx.commit().map_err(|e| Error::database(e.to_string()))
}
