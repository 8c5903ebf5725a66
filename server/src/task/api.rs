use crate::task::web::TaskState;
use crate::task::{Task, TaskService, TaskServiceError, TaskUpdate};
use crate::web::api::ErrorResponse;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier for the task
    id: u32,
    /// Short human-readable title
    title: String,
    /// Free-form description, empty when unset
    description: String,
    /// Status key, `pending` unless set otherwise
    status: String,
    /// Priority key, `medium` unless set otherwise
    priority: String,
    /// Creation timestamp (UTC)
    created_at: chrono::DateTime<chrono::Utc>,
    /// Last modification timestamp (UTC)
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            status: task.status().to_string(),
            priority: task.priority().to_string(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// JSON request payload for creating a task.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Required title; requests without one are rejected with 400
    title: Option<String>,
    /// Optional description, defaults to empty
    description: Option<String>,
    /// Optional status key, defaults to `pending`; not validated
    status: Option<String>,
    /// Optional priority key, defaults to `medium`; not validated
    priority: Option<String>,
}

/// JSON request payload for partially updating a task.
/// Omitted fields keep their prior values.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
}

fn storage_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("STORAGE_ERROR", message)),
    )
}

fn task_not_found(id: u32) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "NOT_FOUND",
            format!("Task with ID {} not found", id),
        )),
    )
}

/// Handler for GET /api/tasks - Returns all tasks in JSON format, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<Vec<TaskJson>>, (StatusCode, Json<ErrorResponse>)> {
    let service = TaskService::new(&state.db);

    match service.list_tasks().await {
        Ok(tasks) => Ok(Json(tasks.into_iter().map(TaskJson::from).collect())),
        Err(err) => {
            tracing::error!("Failed to list tasks: {}", err);
            Err(storage_error("Failed to retrieve tasks"))
        }
    }
}

/// Handler for POST /api/tasks - Creates a task and returns it with 201.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Title missing or empty", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskJson>), (StatusCode, Json<ErrorResponse>)> {
    let title = match payload.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("VALIDATION_ERROR", "Title is required")),
            ));
        }
    };

    let service = TaskService::new(&state.db);

    match service
        .create_task(title, payload.description, payload.status, payload.priority)
        .await
    {
        Ok(task) => Ok((StatusCode::CREATED, Json(TaskJson::from(task)))),
        Err(err) => {
            tracing::error!("Failed to create task: {}", err);
            Err(storage_error("Failed to create task"))
        }
    }
}

/// Handler for PUT /api/tasks/{id} - Applies a partial update and returns the task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    request_body = UpdateTaskRequest,
    params(
        ("id" = u32, Path, description = "ID of the task to update")
    ),
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskJson>, (StatusCode, Json<ErrorResponse>)> {
    let service = TaskService::new(&state.db);
    let updates = TaskUpdate {
        title: payload.title,
        description: payload.description,
        status: payload.status,
        priority: payload.priority,
    };

    match service.update_task(id, updates).await {
        Ok(task) => Ok(Json(TaskJson::from(task))),
        Err(TaskServiceError::TaskNotFound(_)) => Err(task_not_found(id)),
        Err(err) => {
            tracing::error!("Failed to update task {}: {}", id, err);
            Err(storage_error("Failed to update task"))
        }
    }
}

/// Handler for DELETE /api/tasks/{id} - Removes the task and returns 204.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(
        ("id" = u32, Path, description = "ID of the task to delete")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let service = TaskService::new(&state.db);

    match service.delete_task(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(TaskServiceError::TaskNotFound(_)) => Err(task_not_found(id)),
        Err(err) => {
            tracing::error!("Failed to delete task {}: {}", id, err);
            Err(storage_error("Failed to delete task"))
        }
    }
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            put(update_task_handler).delete(delete_task_handler),
        )
        .with_state(state)
}
