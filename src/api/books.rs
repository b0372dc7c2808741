//! Book catalog endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook},
};

use super::{body_or_default, CreatedResponse, RecordId};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    id: RecordId,
) -> AppResult<Json<Book>> {
    let id = id.or_not_found("Book not found")?;
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = CreatedResponse),
        (status = 400, description = "Missing title or author", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    body: Result<Json<CreateBook>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.books.create(body_or_default(body)?).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Book added successfully".to_string(),
            id,
        }),
    ))
}
