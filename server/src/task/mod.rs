use chrono::{DateTime, Utc};
use sea_orm::*;

use crate::entities::*;
use crate::status;

pub mod api;
pub mod events;
pub mod web;

#[derive(Debug, PartialEq, Clone)]
pub struct Task {
    id: u32,
    title: String,
    description: String,
    status: String,
    priority: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: u32,
        title: String,
        description: String,
        status: String,
        priority: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            priority,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task, empty when unset.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status key of the task.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the priority key of the task.
    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Returns the creation timestamp of the task.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp of the task.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(
            model.id as u32,
            model.title,
            model.description,
            model.status,
            model.priority,
            model.created_at,
            model.updated_at,
        )
    }
}

/// Partial update to a task. `None` fields keep their prior values.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// Represents a task not found error.
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService {
        TaskService { db }
    }

    /// Creates a new task in the database.
    ///
    /// Missing optional fields receive their defaults: an empty description,
    /// `pending` status and `medium` priority. Both timestamps are stamped
    /// with the same instant. Emits a `Created` lifecycle event on success.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the task.
    /// * `description` - Optional free-form description.
    /// * `status` - Optional status key; not validated against the catalog.
    /// * `priority` - Optional priority key; not validated against the catalog.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(
        &self,
        title: String,
        description: Option<String>,
        status: Option<String>,
        priority: Option<String>,
    ) -> Result<Task, TaskServiceError> {
        let now = Utc::now();
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description.unwrap_or_default()),
            status: ActiveValue::Set(status.unwrap_or_else(|| status::DEFAULT_STATUS.to_string())),
            priority: ActiveValue::Set(
                priority.unwrap_or_else(|| status::DEFAULT_PRIORITY.to_string()),
            ),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;

        let created_task = Task::from(created_model);
        events::log_task_event(&events::TaskEvent::Created(created_task.clone()));
        Ok(created_task)
    }

    /// Edits a task by its ID, changing only the supplied fields.
    ///
    /// `updated_at` is always refreshed, even when no field is supplied.
    /// Emits an `Updated` lifecycle event on success.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to edit.
    /// * `updates` - The fields to change; `None` fields keep their prior values.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&self, id: u32, updates: TaskUpdate) -> Result<Task, TaskServiceError> {
        let task_to_update = task::Entity::find_by_id(id as i32)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let mut active_model: task::ActiveModel = task_to_update.into();
        if let Some(title) = updates.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = updates.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(new_status) = updates.status {
            active_model.status = ActiveValue::Set(new_status);
        }
        if let Some(priority) = updates.priority {
            active_model.priority = ActiveValue::Set(priority);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        let updated_model = active_model.update(self.db).await?;

        let updated_task = Task::from(updated_model);
        events::log_task_event(&events::TaskEvent::Updated(updated_task.clone()));
        Ok(updated_task)
    }

    /// Deletes a task by its ID. The delete is hard; no tombstone remains.
    ///
    /// Emits a `Deleted` lifecycle event carrying only the ID, since the row
    /// no longer exists.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to delete.
    ///
    /// # Returns
    ///
    /// A `Result` containing `()` if a row was removed, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: u32) -> Result<(), TaskServiceError> {
        let result = task::Entity::delete_by_id(id as i32).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(id));
        }

        events::log_task_event(&events::TaskEvent::Deleted(id));
        Ok(())
    }

    /// Retrieves all tasks from the database, newest first.
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: u32) -> Result<Task, TaskServiceError> {
        let task_model = task::Entity::find_by_id(id as i32)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Ok(Task::from(task_model))
    }
}
