use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::status::{self, StatusDescriptor};
use crate::task::{Task, TaskService, TaskServiceError, TaskUpdate};

#[derive(Debug, Deserialize)]
pub struct CreateTaskForm {
    title: String,
    description: String,
    status: String,
    priority: String,
}

#[derive(Debug, Deserialize)]
pub struct EditTaskForm {
    title: String,
    description: String,
    status: String,
    priority: String,
}

/// Shared state for task handlers: the injected database handle.
#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Custom error type for task handler operations.
#[derive(Debug, thiserror::Error)]
enum TaskError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a task service error.
    #[error("Task service error")]
    Service(#[from] TaskServiceError),
    /// Represents a missing or blank task title.
    #[error("A task title is required")]
    EmptyTitle,
}

impl axum::response::IntoResponse for TaskError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, user_facing_error_message) = match self {
            TaskError::Service(TaskServiceError::TaskNotFound(_)) => (
                StatusCode::NOT_FOUND,
                "That task no longer exists. Refresh the list and try again.",
            ),
            TaskError::EmptyTitle => (
                StatusCode::BAD_REQUEST,
                "A task title is required. Enter a title and try again.",
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred while processing your request. Please try again later.",
            ),
        };

        let error_template = ErrorMessageTemplate::new(user_facing_error_message.to_string());
        let Ok(rendered) = error_template.render() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        let mut response = (status_code, Html(rendered)).into_response();
        // Add HTMX headers to retarget the error message to the error div
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-retarget"),
            HeaderValue::from_static("#error-message"),
        );
        headers.insert(
            HeaderName::from_static("hx-reswap"),
            HeaderValue::from_static("innerHTML"),
        );
        response.headers_mut().extend(headers);
        response
    }
}

/// A task paired with the catalog display color of its status badge.
struct TaskRow {
    task: Task,
    status_color: &'static str,
}

impl TaskRow {
    fn new(task: Task) -> Self {
        // Statuses outside the catalog are still rendered, with a neutral badge.
        let status_color = status::describe(task.status())
            .map(|descriptor| descriptor.color)
            .unwrap_or("#6b7280");
        Self { task, status_color }
    }
}

#[derive(Template)]
#[template(path = "tasks.html")]
struct TasksTemplate {}

impl TasksTemplate {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Template)]
#[template(path = "tasks/add_task_form.html")]
struct AddTaskFormTemplate {
    statuses: &'static [StatusDescriptor],
    priorities: &'static [&'static str],
    default_priority: &'static str,
}

impl AddTaskFormTemplate {
    pub fn new() -> Self {
        Self {
            statuses: status::all(),
            priorities: &status::PRIORITIES,
            default_priority: status::DEFAULT_PRIORITY,
        }
    }
}

#[derive(Template)]
#[template(path = "tasks/tasks_table.html")]
struct TasksTableTemplate {
    rows: Vec<TaskRow>,
}

impl TasksTableTemplate {
    pub fn new(rows: Vec<TaskRow>) -> Self {
        Self { rows }
    }
}

#[derive(Template)]
#[template(path = "tasks/task_row.html")]
struct TaskRowTemplate {
    row: TaskRow,
}

impl TaskRowTemplate {
    pub fn new(task: Task) -> Self {
        Self {
            row: TaskRow::new(task),
        }
    }
}

#[derive(Template)]
#[template(path = "tasks/edit_task_form.html")]
struct EditTaskFormTemplate {
    task: Task,
    statuses: &'static [StatusDescriptor],
    priorities: &'static [&'static str],
}

impl EditTaskFormTemplate {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            statuses: status::all(),
            priorities: &status::PRIORITIES,
        }
    }
}

#[derive(Template)]
#[template(path = "tasks/error_message.html")]
struct ErrorMessageTemplate {
    message: String,
}

impl ErrorMessageTemplate {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// Helper function to get all tasks (newest first) and render the table fragment.
#[tracing::instrument(skip(task_service))]
async fn render_tasks_table(task_service: &TaskService<'_>) -> Result<String, TaskError> {
    let tasks = task_service.list_tasks().await?;
    let rows = tasks.into_iter().map(TaskRow::new).collect();
    let table_template = TasksTableTemplate::new(rows);
    table_template.render().map_err(TaskError::from)
}

/// Handler for the / endpoint that displays the task tracker page.
#[tracing::instrument]
async fn tasks_page_handler() -> Result<Html<String>, TaskError> {
    let template = TasksTemplate::new();
    template.render().map(Html).map_err(TaskError::from)
}

/// Handler for GET /tasks/table that returns just the tasks table fragment.
#[tracing::instrument(skip(state))]
async fn tasks_table_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Html<String>, TaskError> {
    let task_service = TaskService::new(&state.db);
    let table_html = render_tasks_table(&task_service).await?;
    Ok(Html(table_html))
}

/// Handler for serving the add task form.
#[tracing::instrument]
async fn add_task_form_handler() -> Result<Html<String>, TaskError> {
    let template = AddTaskFormTemplate::new();
    template.render().map(Html).map_err(TaskError::from)
}

/// Handler for creating a new task via POST request.
#[tracing::instrument(skip(state))]
async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    Form(form): Form<CreateTaskForm>,
) -> Result<Html<String>, TaskError> {
    // The template's `required` attribute is client-side only; enforce the
    // non-empty title here as well.
    if form.title.trim().is_empty() {
        return Err(TaskError::EmptyTitle);
    }

    let task_service = TaskService::new(&state.db);

    task_service
        .create_task(
            form.title,
            Some(form.description),
            Some(form.status),
            Some(form.priority),
        )
        .await?;

    // Get updated tasks for the table and render
    let table_html = render_tasks_table(&task_service).await?;
    Ok(Html(table_html))
}

/// Handler for GET /tasks/{id} that returns a single task row.
#[tracing::instrument(skip(state))]
async fn get_task_row_handler(
    State(state): State<Arc<TaskState>>,
    axum::extract::Path(id): axum::extract::Path<u32>,
) -> Result<Html<String>, TaskError> {
    let task_service = TaskService::new(&state.db);

    let task = task_service.get_task_by_id(id).await?;
    let template = TaskRowTemplate::new(task);
    template.render().map(Html).map_err(TaskError::from)
}

/// Handler for serving the edit task form.
#[tracing::instrument(skip(state))]
async fn edit_task_handler(
    State(state): State<Arc<TaskState>>,
    axum::extract::Path(id): axum::extract::Path<u32>,
) -> Result<Html<String>, TaskError> {
    let task_service = TaskService::new(&state.db);

    let task = task_service.get_task_by_id(id).await?;
    let template = EditTaskFormTemplate::new(task);
    template.render().map(Html).map_err(TaskError::from)
}

/// Handler for updating a task via PUT request.
#[tracing::instrument(skip(state))]
async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    axum::extract::Path(id): axum::extract::Path<u32>,
    Form(form): Form<EditTaskForm>,
) -> Result<Html<String>, TaskError> {
    let task_service = TaskService::new(&state.db);

    let updates = TaskUpdate {
        title: Some(form.title),
        description: Some(form.description),
        status: Some(form.status),
        priority: Some(form.priority),
    };
    let updated_task = task_service.update_task(id, updates).await?;

    // Render only the updated task row
    let row_template = TaskRowTemplate::new(updated_task);
    let row_html = row_template.render().map_err(TaskError::from)?;

    Ok(Html(row_html))
}

/// Handler for deleting a task via DELETE request.
#[tracing::instrument(skip(state))]
async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    axum::extract::Path(id): axum::extract::Path<u32>,
) -> Result<Html<String>, TaskError> {
    let task_service = TaskService::new(&state.db);

    task_service.delete_task(id).await?;

    // Get updated tasks for the table and render
    let table_html = render_tasks_table(&task_service).await?;
    Ok(Html(table_html))
}

/// Creates and returns the task router with all task-related routes.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/", get(tasks_page_handler))
        .route("/tasks", axum::routing::post(create_task_handler))
        .route("/tasks/table", get(tasks_table_handler))
        .route("/tasks/add", get(add_task_form_handler))
        .route(
            "/tasks/{id}",
            get(get_task_row_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/tasks/{id}/edit", get(edit_task_handler))
        .with_state(state)
}
