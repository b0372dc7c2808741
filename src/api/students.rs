//! Student directory endpoints

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};

use serde_json::{Map, Value};

use crate::{
    error::AppResult,
    models::student::{CreateStudent, Student, StudentPage, StudentQuery, UpdateStudent},
};

use super::{body_or_default, read_body, CreatedResponse, MessageResponse, RecordId};

const NOT_FOUND_MESSAGE: &str = "Student not found";

/// List students with pagination
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    params(StudentQuery),
    responses(
        (status = 200, description = "One page of students", body = StudentPage)
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<StudentPage>> {
    let page = state
        .services
        .students
        .list(&query, &state.config.pagination)
        .await?;
    Ok(Json(page))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    id: RecordId,
) -> AppResult<Json<Student>> {
    let id = id.or_not_found(NOT_FOUND_MESSAGE)?;
    let student = state.services.students.get_by_id(id).await?;
    Ok(Json(student))
}

/// Add a student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = CreatedResponse),
        (status = 400, description = "Missing fields or bad date", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_student(
    State(state): State<crate::AppState>,
    body: Result<Json<CreateStudent>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.students.create(body_or_default(body)?).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Student added successfully".to_string(),
            id,
        }),
    ))
}

/// Update some fields of a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = MessageResponse),
        (status = 400, description = "No data or bad date", body = crate::error::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_student(
    State(state): State<crate::AppState>,
    id: RecordId,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let id = id.or_not_found(NOT_FOUND_MESSAGE)?;
    state.services.students.update(id, read_body(body)).await?;
    Ok(Json(MessageResponse::new("Student updated successfully")))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_student(
    State(state): State<crate::AppState>,
    id: RecordId,
) -> AppResult<Json<MessageResponse>> {
    let id = id.or_not_found(NOT_FOUND_MESSAGE)?;
    state.services.students.delete(id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
