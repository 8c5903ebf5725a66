use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tasktracker_server::task::TaskService;
use tasktracker_server::task::web::{TaskState, create_task_router};
use tower::ServiceExt;

mod common;

/// Setup function building the web UI router on a fresh database.
/// The connection is returned as well so tests can seed data directly.
async fn setup_router() -> anyhow::Result<(Router, DatabaseConnection)> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = common::setup_db().await?;
    let state = Arc::new(TaskState {
        db: Arc::new(db.clone()),
    });
    Ok((create_task_router(state), db))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn index_page_renders() {
    let (router, _db) = setup_router().await.expect("Failed to setup router");

    let response = router.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    assert!(body.contains("Task Tracker"));
    assert!(body.contains("id=\"tasks-table\""));
}

#[tokio::test]
async fn add_form_offers_catalog_statuses() {
    let (router, _db) = setup_router().await.expect("Failed to setup router");

    let response = router.oneshot(get_request("/tasks/add")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    assert!(body.contains("value=\"pending\""));
    assert!(body.contains("value=\"in-progress\""));
    assert!(body.contains("value=\"completed\""));
}

#[tokio::test]
async fn add_form_offers_priorities_with_medium_default() {
    let (router, _db) = setup_router().await.expect("Failed to setup router");

    let response = router.oneshot(get_request("/tasks/add")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    assert!(body.contains("value=\"low\""));
    assert!(body.contains("value=\"medium\" selected"));
    assert!(body.contains("value=\"high\""));
}

#[tokio::test]
async fn creating_task_with_blank_title_is_rejected() {
    let (router, db) = setup_router().await.expect("Failed to setup router");

    let response = router
        .oneshot(form_request(
            Method::POST,
            "/tasks",
            "title=&description=&status=pending&priority=medium",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("hx-retarget").unwrap(),
        "#error-message"
    );
    let body = response_text(response).await;
    assert!(body.contains("title is required"));

    // Nothing was persisted.
    let service = TaskService::new(&db);
    let tasks = service.list_tasks().await.expect("Failed to list tasks");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn creating_task_with_whitespace_title_is_rejected() {
    let (router, db) = setup_router().await.expect("Failed to setup router");

    let response = router
        .oneshot(form_request(
            Method::POST,
            "/tasks",
            "title=+++&description=&status=pending&priority=medium",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let service = TaskService::new(&db);
    let tasks = service.list_tasks().await.expect("Failed to list tasks");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn creating_task_via_form_returns_table_with_task() {
    let (router, _db) = setup_router().await.expect("Failed to setup router");

    let response = router
        .oneshot(form_request(
            Method::POST,
            "/tasks",
            "title=Water+the+plants&description=&status=pending&priority=medium",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    assert!(body.contains("Water the plants"));
    assert!(body.contains("class=\"badge\""));
}

#[tokio::test]
async fn table_fragment_lists_seeded_tasks_newest_first() {
    let (router, db) = setup_router().await.expect("Failed to setup router");
    let service = TaskService::new(&db);
    for title in ["First", "Second"] {
        service
            .create_task(title.to_string(), None, None, None)
            .await
            .expect("Failed to seed task");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = router.oneshot(get_request("/tasks/table")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    let first = body.find("First").expect("First should be listed");
    let second = body.find("Second").expect("Second should be listed");
    assert!(second < first, "newest task should come first");
}

#[tokio::test]
async fn edit_form_is_prefilled_with_task_fields() {
    let (router, db) = setup_router().await.expect("Failed to setup router");
    let service = TaskService::new(&db);
    let task = service
        .create_task(
            "Paint the fence".to_string(),
            Some("White".to_string()),
            Some("in-progress".to_string()),
            Some("low".to_string()),
        )
        .await
        .expect("Failed to seed task");

    let response = router
        .oneshot(get_request(&format!("/tasks/{}/edit", task.id())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    assert!(body.contains("value=\"Paint the fence\""));
    assert!(body.contains("value=\"in-progress\" selected"));
    assert!(body.contains("value=\"low\" selected"));
}

#[tokio::test]
async fn updating_task_via_form_returns_updated_row() {
    let (router, db) = setup_router().await.expect("Failed to setup router");
    let service = TaskService::new(&db);
    let task = service
        .create_task("Old title".to_string(), None, None, None)
        .await
        .expect("Failed to seed task");

    let response = router
        .oneshot(form_request(
            Method::PUT,
            &format!("/tasks/{}", task.id()),
            "title=New+title&description=&status=completed&priority=medium",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    assert!(body.contains("New title"));
    assert!(body.contains("completed"));
}

#[tokio::test]
async fn deleting_task_via_button_returns_table_without_it() {
    let (router, db) = setup_router().await.expect("Failed to setup router");
    let service = TaskService::new(&db);
    let task = service
        .create_task("Doomed".to_string(), None, None, None)
        .await
        .expect("Failed to seed task");

    let response = router
        .oneshot(form_request(
            Method::DELETE,
            &format!("/tasks/{}", task.id()),
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_text(response).await;
    assert!(!body.contains("Doomed"));
}

#[tokio::test]
async fn editing_unknown_task_returns_not_found_fragment() {
    let (router, _db) = setup_router().await.expect("Failed to setup router");

    let response = router
        .oneshot(get_request("/tasks/999/edit"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("hx-retarget").unwrap(),
        "#error-message"
    );
}
