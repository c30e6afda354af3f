//! Axum router construction.
//!
//! All paths go through the route table in [`crate::dispatch`]; axum only
//! contributes the HTTP server and the tracing layer.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::dispatch::dispatch;

/// Build the application router.
pub fn build_router(ctx: AppContext) -> Router {
    tracing::debug!(routes = ?ctx.routes.names().collect::<Vec<_>>(), "Building router");

    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
