//! Student directory service

use serde_json::{Map, Value};

use crate::{
    config::PaginationConfig,
    error::AppResult,
    models::{
        pagination::PageRequest,
        student::{CreateStudent, Student, StudentPage, StudentQuery, UpdateStudent},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One page of the directory. Pages past the end are empty.
    pub async fn list(
        &self,
        query: &StudentQuery,
        pagination: &PaginationConfig,
    ) -> AppResult<StudentPage> {
        let page = PageRequest::resolve(query.page, query.per_page, pagination);
        let (students, total) = self.repository.students.list(page).await?;

        Ok(StudentPage {
            total,
            page: page.page,
            per_page: page.per_page,
            students,
        })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        self.repository.students.get_by_id(id).await
    }

    /// Validate and insert a student, returning the new ID
    pub async fn create(&self, data: CreateStudent) -> AppResult<i32> {
        let student = data.validate()?;

        let mut tx = self.repository.begin().await?;
        let id = self.repository.students.create(&mut tx, &student).await?;
        tx.commit().await?;

        tracing::info!(student_id = id, "Student created");
        Ok(id)
    }

    /// Partial update. The student must exist before the body is looked at,
    /// and nothing is written if any field is invalid. `body` is the request
    /// body as read by the handler, including any error reading it.
    pub async fn update(
        &self,
        id: i32,
        body: AppResult<Option<Map<String, Value>>>,
    ) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;

        self.repository.students.get_for_update(&mut tx, id).await?;
        let changes = UpdateStudent::from_body(body?)?.validate()?;
        self.repository.students.update(&mut tx, id, &changes).await?;

        tx.commit().await?;

        tracing::info!(student_id = id, changed = !changes.is_empty(), "Student updated");
        Ok(())
    }

    /// Delete a student. Outstanding borrows do not block deletion.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        self.repository.students.delete(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(student_id = id, "Student deleted");
        Ok(())
    }
}
