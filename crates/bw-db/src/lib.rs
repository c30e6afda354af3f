//! bw-db: relational persistence for bookwiki.
//!
//! SQLite storage with r2d2 connection pooling, an embedded schema, the
//! record types (posts, books and their lookup tables) and a small
//! relational mapper that turns those records into rows and back.

pub mod mapper;
pub mod migrations;
pub mod models;
pub mod pool;
