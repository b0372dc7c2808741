//! Book catalog service

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateBook) -> AppResult<i32> {
        let book = data.validate()?;

        let mut tx = self.repository.begin().await?;
        let id = self.repository.books.create(&mut tx, &book).await?;
        tx.commit().await?;

        tracing::info!(book_id = id, "Book created");
        Ok(id)
    }
}
