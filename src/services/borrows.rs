//! Borrow ledger service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowRecord, BorrowRequest, BorrowedBook, ReturnRequest, StudentBorrowedBook},
    repository::Repository,
};

pub const ALREADY_BORROWED_MESSAGE: &str = "Book is already borrowed";
pub const NOT_BORROWED_MESSAGE: &str = "No active borrow for this book";

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books a student currently holds. Unknown students simply have none.
    pub async fn get_student_borrows(&self, student_id: i32) -> AppResult<Vec<StudentBorrowedBook>> {
        self.repository.borrows.list_active_for_student(student_id).await
    }

    /// Every book currently out
    pub async fn get_active_borrows(&self) -> AppResult<Vec<BorrowedBook>> {
        self.repository.borrows.list_active().await
    }

    /// Record that a student took a book.
    ///
    /// Student and book IDs are not checked against their tables.
    pub async fn borrow(&self, request: &BorrowRequest) -> AppResult<i32> {
        let (student_id, book_id) = request.validate()?;

        let mut tx = self.repository.begin().await?;

        if let Some(current) = self
            .repository
            .borrows
            .find_active_by_book(&mut tx, book_id)
            .await?
        {
            tracing::debug!(
                book_id,
                holder = current.student_id,
                "Borrow refused, book already out"
            );
            return Err(AppError::Conflict(ALREADY_BORROWED_MESSAGE.to_string()));
        }

        // A concurrent borrow may have committed since the check above
        let id = self
            .repository
            .borrows
            .insert_if_available(&mut tx, student_id, book_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::Conflict(ALREADY_BORROWED_MESSAGE.to_string()))?;

        tx.commit().await?;

        tracing::info!(borrow_id = id, student_id, book_id, "Book borrowed");
        Ok(id)
    }

    /// Close the active borrow of a book.
    ///
    /// Returning a book that is not out is `NotFound`, so a second return of
    /// the same book fails.
    pub async fn return_book(&self, request: &ReturnRequest) -> AppResult<BorrowRecord> {
        let book_id = request.validate()?;

        let mut tx = self.repository.begin().await?;
        let record = self
            .repository
            .borrows
            .mark_returned(&mut tx, book_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_BORROWED_MESSAGE.to_string()))?;
        tx.commit().await?;

        tracing::info!(
            borrow_id = record.id,
            student_id = record.student_id,
            book_id,
            "Book returned"
        );
        Ok(record)
    }
}
