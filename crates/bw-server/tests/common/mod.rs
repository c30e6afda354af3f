//! Shared test harness for integration tests.
//!
//! [`TestHarness`] wires an in-memory database, a temporary pages directory
//! and the shipped templates into a full [`AppContext`]. [`with_server`]
//! starts axum on a random port for HTTP-level testing.
//!
//! [`with_server`]: TestHarness::with_server

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use bw_core::config::Config;
use bw_db::pool::{init_memory_pool, DbPool};
use bw_server::context::AppContext;
use bw_server::router::build_router;
use bw_server::templates::Templates;
use tempfile::TempDir;

pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub pages: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let pages = tempfile::tempdir().expect("failed to create pages dir");
        let dir = pages.path().to_path_buf();
        Self::with_pages_dir(pages, dir)
    }

    /// Like [`new`](Self::new), but pages are stored in `dir` rather than in
    /// the harness's own temp directory.
    pub fn with_pages_dir(pages: TempDir, dir: PathBuf) -> Self {
        let mut config = Config::default();
        config.wiki.pages_dir = dir;
        config.wiki.templates_dir = templates_dir();

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let templates =
            Templates::load(&config.wiki.templates_dir).expect("failed to load templates");
        let ctx = AppContext::new(config, db.clone(), templates).expect("failed to build context");

        Self { ctx, db, pages }
    }

    /// Start an axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::new().serve().await
    }

    /// Serve this harness on a random port.
    pub async fn serve(self) -> (Self, SocketAddr) {
        let app = build_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (self, addr)
    }

    pub fn pages_dir(&self) -> &Path {
        self.pages.path()
    }

    pub fn conn(&self) -> bw_db::pool::PooledConnection {
        bw_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }
}

/// Directory holding the templates shipped with the repository.
pub fn templates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// A client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build client")
}
