//! API integration tests
//!
//! Each test gets a fresh database from `#[sqlx::test]` (migrations applied)
//! and drives the router in-process. Requires `DATABASE_URL`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use campus_library_server::{
    config::AppConfig, create_router, repository::Repository, services::Services, AppState,
};

fn app(pool: PgPool) -> Router {
    app_with_config(pool, AppConfig::default())
}

fn app_with_config(pool: PgPool, config: AppConfig) -> Router {
    let services = Services::new(Repository::new(pool));

    create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn add_student(app: &Router, first_name: &str, last_name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/students",
        Some(json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": format!("{}.{}@school.test", first_name, last_name).to_lowercase(),
            "birth_date": "2011-05-17"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Student added successfully");
    body["id"].as_i64().expect("No student ID")
}

async fn add_book(app: &Router, title: &str, author: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({ "title": title, "author": author })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No book ID")
}

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[sqlx::test]
async fn test_health_check(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[sqlx::test]
async fn test_create_and_get_student(pool: PgPool) {
    let app = app(pool);
    let id = add_student(&app, "Ada", "Lovelace").await;

    let (status, body) = send(&app, Method::GET, &format!("/students/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["last_name"], "Lovelace");
    assert_eq!(body["email"], "ada.lovelace@school.test");
    assert_eq!(body["birth_date"], "2011-05-17");
}

#[sqlx::test]
async fn test_create_student_ids_are_unique(pool: PgPool) {
    let app = app(pool);
    let first = add_student(&app, "Ada", "Lovelace").await;
    let second = add_student(&app, "Alan", "Turing").await;
    assert_ne!(first, second);
}

#[sqlx::test]
async fn test_create_student_without_birth_date(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "first_name": "Grace", "last_name": "Hopper", "email": "grace@school.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, &format!("/students/{}", body["id"]), None).await;
    assert!(body["birth_date"].is_null());
}

#[sqlx::test]
async fn test_create_student_missing_email(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "first_name": "Ada", "last_name": "Lovelace" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid data, first_name, last_name, and email are required"
    );
}

#[sqlx::test]
async fn test_create_student_without_body(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, Method::POST, "/students", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_create_student_bad_date(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/students",
        Some(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@school.test",
            "birth_date": "17/05/2011"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format, expected YYYY-MM-DD");

    let (_, body) = send(&app, Method::GET, "/students", None).await;
    assert_eq!(body["total"], 0);
}

#[sqlx::test]
async fn test_get_missing_student(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/students/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");
}

#[sqlx::test]
async fn test_list_students_pagination(pool: PgPool) {
    let app = app(pool);
    add_student(&app, "Ada", "Lovelace").await;
    let second = add_student(&app, "Alan", "Turing").await;

    let (status, body) = send(&app, Method::GET, "/students?page=2&per_page=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 1);

    let students = body["students"].as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["id"], second);
    assert_eq!(students[0]["first_name"], "Alan");
}

#[sqlx::test]
async fn test_list_students_defaults_and_out_of_range(pool: PgPool) {
    let app = app(pool);
    add_student(&app, "Ada", "Lovelace").await;

    let (_, body) = send(&app, Method::GET, "/students", None).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["students"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/students?page=9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert!(body["students"].as_array().unwrap().is_empty());
}

#[sqlx::test]
async fn test_list_students_non_numeric_query_uses_defaults(pool: PgPool) {
    let app = app(pool);
    add_student(&app, "Ada", "Lovelace").await;

    let (status, body) = send(&app, Method::GET, "/students?page=abc&per_page=x", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["students"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/students?page=&per_page=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 1);
}

#[sqlx::test]
async fn test_list_students_per_page_follows_config(pool: PgPool) {
    let mut config = AppConfig::default();
    config.pagination.default_per_page = 2;
    config.pagination.max_per_page = 3;
    let app = app_with_config(pool, config);

    let (_, body) = send(&app, Method::GET, "/students", None).await;
    assert_eq!(body["per_page"], 2);

    let (_, body) = send(&app, Method::GET, "/students?per_page=50", None).await;
    assert_eq!(body["per_page"], 3);
}

#[sqlx::test]
async fn test_out_of_range_ids_are_not_found(pool: PgPool) {
    let app = app(pool);
    add_student(&app, "Ada", "Lovelace").await;

    let (status, body) = send(&app, Method::GET, "/students/4294967296", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/students/4294967296",
        Some(json!({ "first_name": "Augusta" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");

    let (status, body) = send(&app, Method::DELETE, "/students/4294967296", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");

    let (status, body) = send(&app, Method::GET, "/books/4294967296", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    let (status, body) = send(&app, Method::GET, "/students/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[sqlx::test]
async fn test_update_student_partial(pool: PgPool) {
    let app = app(pool);
    let id = add_student(&app, "Ada", "Lovelace").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/students/{}", id),
        Some(json!({ "last_name": "King", "birth_date": "2010-12-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student updated successfully");

    let (_, body) = send(&app, Method::GET, &format!("/students/{}", id), None).await;
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["last_name"], "King");
    assert_eq!(body["email"], "ada.lovelace@school.test");
    assert_eq!(body["birth_date"], "2010-12-10");
}

#[sqlx::test]
async fn test_update_student_bad_date_leaves_record_unchanged(pool: PgPool) {
    let app = app(pool);
    let id = add_student(&app, "Ada", "Lovelace").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/students/{}", id),
        Some(json!({ "first_name": "Augusta", "birth_date": "31-02-2024" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format, expected YYYY-MM-DD");

    let (_, body) = send(&app, Method::GET, &format!("/students/{}", id), None).await;
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["birth_date"], "2011-05-17");
}

#[sqlx::test]
async fn test_update_student_empty_body(pool: PgPool) {
    let app = app(pool);
    let id = add_student(&app, "Ada", "Lovelace").await;

    let (status, body) = send(&app, Method::PUT, &format!("/students/{}", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");

    let (status, _) = send(&app, Method::PUT, &format!("/students/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_update_student_unknown_fields_only(pool: PgPool) {
    let app = app(pool);
    let id = add_student(&app, "Ada", "Lovelace").await;
    let (_, before) = send(&app, Method::GET, &format!("/students/{}", id), None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/students/{}", id),
        Some(json!({ "nickname": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student updated successfully");

    let (_, after) = send(&app, Method::GET, &format!("/students/{}", id), None).await;
    assert_eq!(before, after);
}

#[sqlx::test]
async fn test_update_missing_student_is_not_found_before_body_check(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, Method::PUT, "/students/4242", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_delete_student(pool: PgPool) {
    let app = app(pool);
    let id = add_student(&app, "Ada", "Lovelace").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/students/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/students/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/students/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_delete_student_with_active_borrow(pool: PgPool) {
    let app = app(pool);
    let student = add_student(&app, "Ada", "Lovelace").await;
    let book = add_book(&app, "Dune", "Frank Herbert").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": student, "book_id": book })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Deletion is not blocked and the borrow record stays behind
    let (status, _) = send(&app, Method::DELETE, &format!("/students/{}", student), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/books/borrowed", None).await;
    let borrowed = body.as_array().unwrap();
    assert_eq!(borrowed.len(), 1);
    assert_eq!(borrowed[0]["borrower_id"], student);
}

#[sqlx::test]
async fn test_borrow_and_list(pool: PgPool) {
    let app = app(pool);
    let student = add_student(&app, "Ada", "Lovelace").await;
    let book = add_book(&app, "Dune", "Frank Herbert").await;
    add_book(&app, "Neuromancer", "William Gibson").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": student, "book_id": book })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book successfully borrowed");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/students/{}/borrowed_books", student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "book_id": book, "title": "Dune", "borrow_date": today() }])
    );

    let (status, body) = send(&app, Method::GET, "/books/borrowed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "book_id": book,
            "title": "Dune",
            "author": "Frank Herbert",
            "borrow_date": today(),
            "borrower_id": student
        }])
    );
}

#[sqlx::test]
async fn test_borrowed_books_of_unknown_student_is_empty(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/students/4242/borrowed_books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[sqlx::test]
async fn test_borrowed_books_of_out_of_range_student_is_empty(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/students/4294967296/borrowed_books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[sqlx::test]
async fn test_borrow_with_wrongly_typed_id_is_rejected(pool: PgPool) {
    let app = app(pool);
    let book = add_book(&app, "Dune", "Frank Herbert").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": "3", "book_id": book })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed JSON body"));

    let (_, body) = send(&app, Method::GET, "/books/borrowed", None).await;
    assert_eq!(body, json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "first_name": "Ada", "last_name": 7, "email": "ada@school.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed JSON body"));
}

#[sqlx::test]
async fn test_borrow_already_borrowed_book(pool: PgPool) {
    let app = app(pool);
    let first = add_student(&app, "Ada", "Lovelace").await;
    let second = add_student(&app, "Alan", "Turing").await;
    let book = add_book(&app, "Dune", "Frank Herbert").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": first, "book_id": book })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": second, "book_id": book })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Book is already borrowed");

    let (_, body) = send(&app, Method::GET, "/books/borrowed", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["borrower_id"], first);
}

#[sqlx::test]
async fn test_concurrent_borrows_of_same_book(pool: PgPool) {
    let app = app(pool);
    let first = add_student(&app, "Ada", "Lovelace").await;
    let second = add_student(&app, "Alan", "Turing").await;
    let book = add_book(&app, "Dune", "Frank Herbert").await;

    let (a, b) = tokio::join!(
        send(
            &app,
            Method::POST,
            "/borrow",
            Some(json!({ "student_id": first, "book_id": book })),
        ),
        send(
            &app,
            Method::POST,
            "/borrow",
            Some(json!({ "student_id": second, "book_id": book })),
        ),
    );

    let mut statuses = vec![a.0, b.0];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let (_, body) = send(&app, Method::GET, "/books/borrowed", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test]
async fn test_borrow_requires_ids(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::POST, "/borrow", Some(json!({ "student_id": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "student_id and book_id are required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": 0, "book_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/borrow", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_borrow_accepts_unknown_student(pool: PgPool) {
    let app = app(pool);
    let book = add_book(&app, "Dune", "Frank Herbert").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": 4242, "book_id": book })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/students/4242/borrowed_books", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test]
async fn test_return_then_borrow_again(pool: PgPool) {
    let app = app(pool);
    let first = add_student(&app, "Ada", "Lovelace").await;
    let second = add_student(&app, "Alan", "Turing").await;
    let book = add_book(&app, "Dune", "Frank Herbert").await;

    send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": first, "book_id": book })),
    )
    .await;

    let (status, body) = send(&app, Method::POST, "/return", Some(json!({ "book_id": book }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book successfully returned");

    let (_, body) = send(&app, Method::GET, &format!("/students/{}/borrowed_books", first), None).await;
    assert_eq!(body, json!([]));

    // Returning twice is not idempotent
    let (status, body) = send(&app, Method::POST, "/return", Some(json!({ "book_id": book }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No active borrow for this book");

    let (status, _) = send(
        &app,
        Method::POST,
        "/borrow",
        Some(json!({ "student_id": second, "book_id": book })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/books/borrowed", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["borrower_id"], second);
}

#[sqlx::test]
async fn test_books_catalog(pool: PgPool) {
    let app = app(pool);
    let id = add_book(&app, "Dune", "Frank Herbert").await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": id, "title": "Dune", "author": "Frank Herbert" }));

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/books/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/books", Some(json!({ "title": "Untitled" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
