//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, health, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Library API",
        version = "0.3.0",
        description = "Student directory and borrow ledger REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Students
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        // Borrows
        borrows::get_student_borrowed_books,
        borrows::get_borrowed_books,
        borrows::borrow_book,
        borrows::return_book,
    ),
    components(
        schemas(
            // Students
            crate::models::student::Student,
            crate::models::student::StudentPage,
            crate::models::student::StudentQuery,
            crate::models::student::CreateStudent,
            crate::models::student::UpdateStudent,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            // Borrows
            crate::models::borrow::StudentBorrowedBook,
            crate::models::borrow::BorrowedBook,
            crate::models::borrow::BorrowRequest,
            crate::models::borrow::ReturnRequest,
            // Common
            crate::api::MessageResponse,
            crate::api::CreatedResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "students", description = "Student directory"),
        (name = "books", description = "Book catalog"),
        (name = "borrows", description = "Borrow ledger")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
