use axum::extract::Request;
use axum::response::{IntoResponse, Response};

use crate::context::AppContext;
use crate::dispatch::PathParams;
use crate::error::AppError;

/// GET /health
pub async fn health(
    _ctx: AppContext,
    _params: PathParams,
    _req: Request,
) -> Result<Response, AppError> {
    Ok("ok".into_response())
}
