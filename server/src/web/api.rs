use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::status;
use crate::task::{self, web::TaskState};

/// JSON response for API errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// OpenAPI document covering the JSON API.
#[derive(OpenApi)]
#[openapi(
    paths(
        task::api::list_tasks_handler,
        task::api::create_task_handler,
        task::api::update_task_handler,
        task::api::delete_task_handler,
        status::api::get_statuses_handler,
    ),
    components(schemas(
        task::api::TaskJson,
        task::api::CreateTaskRequest,
        task::api::UpdateTaskRequest,
        status::api::StatusDescriptorJson,
        ErrorResponse,
    ))
)]
struct ApiDoc;

/// Handler for GET /api/openapi.json - Returns the OpenAPI document.
#[tracing::instrument]
async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(task_state: Arc<TaskState>) -> axum::Router {
    let tasks_router = task::api::create_api_router(task_state);
    let statuses_router = status::api::create_api_router();
    let api_routes = tasks_router
        .merge(statuses_router)
        .route("/openapi.json", get(openapi_handler));
    Router::new().nest("/api", api_routes)
}
