//! Route handlers. Each is wired into the table in [`crate::dispatch`].

pub mod books;
pub mod health;
pub mod wiki;
