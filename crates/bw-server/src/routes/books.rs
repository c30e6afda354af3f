//! Read-only JSON views of the book catalogue.

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bw_core::Error;
use bw_db::mapper;
use bw_db::models::Book;

use crate::context::AppContext;
use crate::dispatch::PathParams;
use crate::error::AppError;

/// GET /books
pub async fn list_books(
    ctx: AppContext,
    _params: PathParams,
    _req: Request,
) -> Result<Response, AppError> {
    let conn = bw_db::pool::get_conn(&ctx.db)?;
    let books: Vec<Book> =
        mapper::select_all(&conn, "SELECT * FROM books ORDER BY book_id", [])?;

    for book in &books {
        tracing::debug!(id = book.id, name = %book.name, "Book");
    }

    Ok(Json(books).into_response())
}

/// GET /books/{id}
pub async fn get_book(
    ctx: AppContext,
    params: PathParams,
    _req: Request,
) -> Result<Response, AppError> {
    let raw = params.require("id")?;
    let id: i64 = raw
        .parse()
        .map_err(|_| Error::Validation(format!("invalid book id: {raw}")))?;

    let conn = bw_db::pool::get_conn(&ctx.db)?;
    let book = mapper::get::<Book>(&conn, id)?.ok_or_else(|| Error::not_found("book", id))?;

    Ok(Json(book).into_response())
}
