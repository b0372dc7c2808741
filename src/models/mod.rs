//! Data models for Campus Library

pub mod book;
pub mod borrow;
pub mod pagination;
pub mod student;

// Re-export commonly used types
pub use book::Book;
pub use borrow::{BorrowRecord, BorrowedBook, StudentBorrowedBook};
pub use pagination::PageRequest;
pub use student::{Student, StudentPage};
