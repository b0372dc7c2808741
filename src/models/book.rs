//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
}

/// Create book request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

impl CreateBook {
    pub fn validate(self) -> AppResult<NewBook> {
        match (self.title, self.author) {
            (Some(title), Some(author)) => Ok(NewBook { title, author }),
            _ => Err(AppError::Validation(
                "Invalid data, title and author are required".to_string(),
            )),
        }
    }
}
