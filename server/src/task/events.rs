//! Lifecycle notifications for task mutations.
//!
//! The log is the only consumer. Events are emitted synchronously right after
//! a successful mutation and are best-effort: a missed or failed log line has
//! no effect on task data.

use super::Task;

/// A lifecycle event raised after a successful task mutation.
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// A task was created.
    Created(Task),
    /// A task was updated.
    Updated(Task),
    /// A task was deleted. Only the ID survives the deletion.
    Deleted(u32),
}

/// Writes one human-readable line per lifecycle event.
pub fn log_task_event(event: &TaskEvent) {
    match event {
        TaskEvent::Created(task) => {
            tracing::info!("Task {} created: '{}'", task.id(), task.title());
        }
        TaskEvent::Updated(task) => {
            tracing::info!("Task {} updated: '{}'", task.id(), task.title());
        }
        TaskEvent::Deleted(id) => {
            tracing::info!("Task {} deleted", id);
        }
    }
}
