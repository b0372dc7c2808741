//! Borrow ledger endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    error::AppResult,
    models::borrow::{BorrowRequest, BorrowedBook, ReturnRequest, StudentBorrowedBook},
};

use super::{body_or_default, MessageResponse, RecordId};

/// Books a student currently holds
#[utoipa::path(
    get,
    path = "/students/{id}/borrowed_books",
    tag = "borrows",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Active borrows of the student (empty if none)", body = Vec<StudentBorrowedBook>)
    )
)]
pub async fn get_student_borrowed_books(
    State(state): State<crate::AppState>,
    RecordId(student_id): RecordId,
) -> AppResult<Json<Vec<StudentBorrowedBook>>> {
    // No stored student can have an out-of-range id
    let Some(student_id) = student_id else {
        return Ok(Json(Vec::new()));
    };

    let books = state.services.borrows.get_student_borrows(student_id).await?;
    Ok(Json(books))
}

/// Every book currently borrowed
#[utoipa::path(
    get,
    path = "/books/borrowed",
    tag = "borrows",
    responses(
        (status = 200, description = "All active borrows", body = Vec<BorrowedBook>)
    )
)]
pub async fn get_borrowed_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<BorrowedBook>>> {
    let books = state.services.borrows.get_active_borrows().await?;
    Ok(Json(books))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrows",
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Book borrowed", body = MessageResponse),
        (status = 400, description = "Missing student_id or book_id", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already borrowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    body: Result<Json<BorrowRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    state.services.borrows.borrow(&body_or_default(body)?).await?;
    Ok(Json(MessageResponse::new("Book successfully borrowed")))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return",
    tag = "borrows",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = MessageResponse),
        (status = 400, description = "Missing book_id", body = crate::error::ErrorResponse),
        (status = 404, description = "Book is not borrowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    body: Result<Json<ReturnRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    state.services.borrows.return_book(&body_or_default(body)?).await?;
    Ok(Json(MessageResponse::new("Book successfully returned")))
}
