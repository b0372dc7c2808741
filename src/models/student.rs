//! Student model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::pagination::lenient_number;
use crate::error::{AppError, AppResult};

/// Date format accepted and produced by the API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MISSING_FIELDS_MESSAGE: &str =
    "Invalid data, first_name, last_name, and email are required";
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format, expected YYYY-MM-DD";
pub const NO_DATA_MESSAGE: &str = "No data provided";

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| AppError::Validation(INVALID_DATE_MESSAGE.to_string()))
}

/// Student record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: Option<NaiveDate>,
    pub email: String,
}

/// Student list query parameters; values that are not integers fall back
/// to the defaults
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StudentQuery {
    #[serde(default, deserialize_with = "lenient_number")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub per_page: Option<i64>,
}

/// One page of the student directory
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentPage {
    /// Total number of students
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Students per page
    pub per_page: i64,
    pub students: Vec<Student>,
}

/// Create student request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: Option<String>,
}

/// Validated student ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
}

impl CreateStudent {
    /// Check required fields and parse the birth date
    pub fn validate(self) -> AppResult<NewStudent> {
        let (Some(first_name), Some(last_name), Some(email)) =
            (self.first_name, self.last_name, self.email)
        else {
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        let birth_date = self.birth_date.as_deref().map(parse_date).transpose()?;

        Ok(NewStudent {
            first_name,
            last_name,
            email,
            birth_date,
        })
    }
}

/// Update student request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: Option<String>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl StudentChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.birth_date.is_none()
    }
}

impl UpdateStudent {
    /// Build an update from the raw JSON object.
    ///
    /// Emptiness is judged on the object itself: a missing body or `{}` is
    /// rejected, while keys this API does not know are accepted and ignored.
    pub fn from_body(body: Option<Map<String, Value>>) -> AppResult<Self> {
        let body = match body {
            Some(body) if !body.is_empty() => body,
            _ => return Err(AppError::Validation(NO_DATA_MESSAGE.to_string())),
        };

        serde_json::from_value(Value::Object(body))
            .map_err(|e| AppError::Validation(format!("Invalid data: {}", e)))
    }

    /// Parse the birth date; absent fields stay unchanged
    pub fn validate(self) -> AppResult<StudentChanges> {
        let birth_date = self.birth_date.as_deref().map(parse_date).transpose()?;

        Ok(StudentChanges {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            birth_date,
        })
    }
}
