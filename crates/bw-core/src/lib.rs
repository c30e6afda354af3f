//! bw-core: shared error type and configuration.
//!
//! Every other bw-* crate funnels its failures into [`Error`] and reads its
//! settings from [`config::Config`].

pub mod config;
pub mod error;

pub use error::{Error, Result};
