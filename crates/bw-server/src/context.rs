//! Application context shared by every handler.

use std::sync::Arc;

use bw_core::config::Config;
use bw_core::Result;
use bw_db::pool::{self, DbPool};

use crate::dispatch::RouteTable;
use crate::pages::PageStore;
use crate::templates::Templates;

/// Everything a request handler needs, assembled once at startup.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind
/// `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Relational store connection pool.
    pub db: DbPool,
    /// Immutable configuration snapshot.
    pub config: Arc<Config>,
    pub pages: Arc<PageStore>,
    pub templates: Arc<Templates>,
    /// Ordered route table consulted by the dispatcher.
    pub routes: Arc<RouteTable>,
}

impl AppContext {
    /// Assemble a context from already-initialized parts.
    pub fn new(config: Config, db: DbPool, templates: Templates) -> Result<Self> {
        let pages = PageStore::new(config.wiki.pages_dir.clone());
        Ok(Self {
            db,
            config: Arc::new(config),
            pages: Arc::new(pages),
            templates: Arc::new(templates),
            routes: Arc::new(RouteTable::wiki()?),
        })
    }

    /// Open the database and load templates as described by `config`.
    ///
    /// Any failure here is a startup failure.
    pub fn build(config: Config) -> Result<Self> {
        let db = pool::init_pool(&config.server.db_path.to_string_lossy())?;
        let templates = Templates::load(&config.wiki.templates_dir)?;
        Self::new(config, db, templates)
    }
}
