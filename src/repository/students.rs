//! Students repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::PageRequest,
        student::{NewStudent, Student, StudentChanges},
    },
};

fn not_found() -> AppError {
    AppError::NotFound("Student not found".to_string())
}

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List students in insertion order with the total count
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<Student>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;

        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, first_name, last_name, birth_date, email
            FROM students
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((students, total))
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, birth_date, email FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    /// Get student by ID and lock the row until the transaction ends
    pub async fn get_for_update(&self, conn: &mut PgConnection, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, first_name, last_name, birth_date, email
            FROM students
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(not_found)
    }

    /// Insert a student and return its ID
    pub async fn create(&self, conn: &mut PgConnection, student: &NewStudent) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO students (first_name, last_name, email, birth_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(student.birth_date)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Apply the supplied fields only
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: i32,
        changes: &StudentChanges,
    ) -> AppResult<()> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(changes.first_name, "first_name");
        add_field!(changes.last_name, "last_name");
        add_field!(changes.email, "email");
        add_field!(changes.birth_date, "birth_date");

        if sets.is_empty() {
            return Ok(());
        }

        let query = format!("UPDATE students SET {} WHERE id = ${}", sets.join(", "), idx);

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(changes.first_name);
        bind_field!(changes.last_name);
        bind_field!(changes.email);
        bind_field!(changes.birth_date);

        let result = builder.bind(id).execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    /// Delete a student. Borrow records are left untouched.
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
