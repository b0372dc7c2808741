//! Borrow ledger model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Ledger row. `return_date` is `None` while the book is out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BorrowRecord {
    pub id: i32,
    pub student_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Active borrow as seen from a student's account
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentBorrowedBook {
    pub book_id: i32,
    pub title: String,
    /// Day the book was borrowed (YYYY-MM-DD)
    pub borrow_date: NaiveDate,
}

#[derive(FromRow)]
pub struct StudentBorrowedBookRow {
    pub book_id: i32,
    pub title: String,
    pub borrow_date: DateTime<Utc>,
}

impl From<StudentBorrowedBookRow> for StudentBorrowedBook {
    fn from(row: StudentBorrowedBookRow) -> Self {
        Self {
            book_id: row.book_id,
            title: row.title,
            borrow_date: row.borrow_date.date_naive(),
        }
    }
}

/// Active borrow in the library-wide listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowedBook {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    /// Day the book was borrowed (YYYY-MM-DD)
    pub borrow_date: NaiveDate,
    pub borrower_id: i32,
}

#[derive(FromRow)]
pub struct BorrowedBookRow {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub borrower_id: i32,
}

impl From<BorrowedBookRow> for BorrowedBook {
    fn from(row: BorrowedBookRow) -> Self {
        Self {
            book_id: row.book_id,
            title: row.title,
            author: row.author,
            borrow_date: row.borrow_date.date_naive(),
            borrower_id: row.borrower_id,
        }
    }
}

/// Borrow request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub student_id: Option<i32>,
    pub book_id: Option<i32>,
}

impl BorrowRequest {
    /// Both ids must be present and non-zero
    pub fn validate(&self) -> AppResult<(i32, i32)> {
        match (self.student_id, self.book_id) {
            (Some(student_id), Some(book_id)) if student_id != 0 && book_id != 0 => {
                Ok((student_id, book_id))
            }
            _ => Err(AppError::Validation(
                "student_id and book_id are required".to_string(),
            )),
        }
    }
}

/// Return request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub book_id: Option<i32>,
}

impl ReturnRequest {
    pub fn validate(&self) -> AppResult<i32> {
        self.book_id
            .filter(|id| *id != 0)
            .ok_or_else(|| AppError::Validation("book_id is required".to_string()))
    }
}
