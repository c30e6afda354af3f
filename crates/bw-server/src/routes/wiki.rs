//! Wiki page handlers: listing, view, edit and save.

use axum::extract::{FromRequest, Query, Request};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use crate::context::AppContext;
use crate::dispatch::PathParams;
use crate::error::AppError;
use crate::pages::Page;
use crate::templates::{EDIT, VIEW};

/// Fields accepted by `/save/{title}`, from the posted form or the query
/// string.
#[derive(Debug, Default, Deserialize)]
pub struct SaveForm {
    pub body: Option<String>,
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// GET /
///
/// Every stored page rendered with the view template, one after another.
/// Pages that fail to load are left out.
pub async fn listing(
    ctx: AppContext,
    _params: PathParams,
    _req: Request,
) -> Result<Response, AppError> {
    let mut html = String::new();
    for title in ctx.pages.list()? {
        let page = match ctx.pages.load(&title) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "Skipping page in listing");
                continue;
            }
        };
        html.push_str(&ctx.templates.render(VIEW, &page)?);
    }
    Ok(Html(html).into_response())
}

/// GET /view/{title}
///
/// A page that cannot be loaded redirects to its edit form.
pub async fn view(
    ctx: AppContext,
    params: PathParams,
    _req: Request,
) -> Result<Response, AppError> {
    let title = params.require("title")?;
    match ctx.pages.load(title) {
        Ok(page) => Ok(Html(ctx.templates.render(VIEW, &page)?).into_response()),
        Err(e) => {
            if !e.is_not_found() {
                tracing::warn!(title, error = %e, "Failed to load page for view");
            }
            Ok(found(format!("/edit/{title}")))
        }
    }
}

/// GET /edit/{title}
///
/// A page that cannot be loaded is edited starting from an empty body.
pub async fn edit(
    ctx: AppContext,
    params: PathParams,
    _req: Request,
) -> Result<Response, AppError> {
    let title = params.require("title")?;
    let page = ctx.pages.load(title).unwrap_or_else(|e| {
        if !e.is_not_found() {
            tracing::warn!(title, error = %e, "Failed to load page for edit");
        }
        Page::empty(title)
    });
    Ok(Html(ctx.templates.render(EDIT, &page)?).into_response())
}

/// POST /save/{title}
///
/// Stores the `body` field and redirects to the page view. The field is read
/// from a urlencoded form body, falling back to the query string; when
/// neither carries it the page is saved empty.
pub async fn save(
    ctx: AppContext,
    params: PathParams,
    req: Request,
) -> Result<Response, AppError> {
    let title = params.require("title")?.to_owned();

    let query = Query::<SaveForm>::try_from_uri(req.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();
    let form = Form::<SaveForm>::from_request(req, &ctx)
        .await
        .map(|Form(f)| f)
        .unwrap_or_default();
    let body = form.body.or(query.body).unwrap_or_default();

    ctx.pages.save(&Page::new(title.as_str(), body))?;
    tracing::info!(title = %title, "Page saved");

    Ok(found(format!("/view/{title}")))
}
