//! Business logic services

pub mod books;
pub mod borrows;
pub mod students;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub students: students::StudentsService,
    pub books: books::BooksService,
    pub borrows: borrows::BorrowsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            students: students::StudentsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn check_database(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
