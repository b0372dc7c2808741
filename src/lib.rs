//! Campus Library
//!
//! REST JSON API for a small school library: a student directory, a book
//! catalog, and a borrow ledger that keeps every book in at most one pair of
//! hands at a time.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Students
        .route(
            "/students",
            get(api::students::list_students).post(api::students::create_student),
        )
        .route(
            "/students/:id",
            get(api::students::get_student)
                .put(api::students::update_student)
                .delete(api::students::delete_student),
        )
        .route(
            "/students/:id/borrowed_books",
            get(api::borrows::get_student_borrowed_books),
        )
        // Books
        .route(
            "/books",
            get(api::books::list_books).post(api::books::create_book),
        )
        .route("/books/borrowed", get(api::borrows::get_borrowed_books))
        .route("/books/:id", get(api::books::get_book))
        // Ledger
        .route("/borrow", post(api::borrows::borrow_book))
        .route("/return", post(api::borrows::return_book))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(api::openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
