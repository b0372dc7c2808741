//! Borrow ledger repository

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::borrow::{
        BorrowRecord, BorrowedBook, BorrowedBookRow, StudentBorrowedBook, StudentBorrowedBookRow,
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Active borrows of one student, oldest first.
    ///
    /// Records pointing at a book that no longer exists are skipped.
    pub async fn list_active_for_student(
        &self,
        student_id: i32,
    ) -> AppResult<Vec<StudentBorrowedBook>> {
        let rows = sqlx::query_as::<_, StudentBorrowedBookRow>(
            r#"
            SELECT b.id AS book_id, b.title, sb.borrow_date
            FROM student_books sb
            JOIN books b ON b.id = sb.book_id
            WHERE sb.student_id = $1 AND sb.return_date IS NULL
            ORDER BY sb.borrow_date, sb.id
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every active borrow in the library, oldest first
    pub async fn list_active(&self) -> AppResult<Vec<BorrowedBook>> {
        let rows = sqlx::query_as::<_, BorrowedBookRow>(
            r#"
            SELECT b.id AS book_id, b.title, b.author, sb.borrow_date,
                   sb.student_id AS borrower_id
            FROM student_books sb
            JOIN books b ON b.id = sb.book_id
            WHERE sb.return_date IS NULL
            ORDER BY sb.borrow_date, sb.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Active record for a book, if any
    pub async fn find_active_by_book(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
    ) -> AppResult<Option<BorrowRecord>> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            SELECT id, student_id, book_id, borrow_date, return_date
            FROM student_books
            WHERE book_id = $1 AND return_date IS NULL
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(record)
    }

    /// Insert an active record unless the book is already out.
    ///
    /// Relies on the partial unique index on `book_id WHERE return_date IS NULL`,
    /// so concurrent callers cannot both succeed. Returns `None` when the
    /// book is taken.
    pub async fn insert_if_available(
        &self,
        conn: &mut PgConnection,
        student_id: i32,
        book_id: i32,
        borrow_date: DateTime<Utc>,
    ) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO student_books (student_id, book_id, borrow_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (book_id) WHERE return_date IS NULL DO NOTHING
            RETURNING id
            "#,
        )
        .bind(student_id)
        .bind(book_id)
        .bind(borrow_date)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(id)
    }

    /// Close the active record of a book. `None` if the book was not out.
    pub async fn mark_returned(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
        return_date: DateTime<Utc>,
    ) -> AppResult<Option<BorrowRecord>> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE student_books
            SET return_date = $2
            WHERE book_id = $1 AND return_date IS NULL
            RETURNING id, student_id, book_id, borrow_date, return_date
            "#,
        )
        .bind(book_id)
        .bind(return_date)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(record)
    }
}
