use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::status::{self, StatusDescriptor};

/// JSON representation of a status descriptor for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusDescriptorJson {
    /// Status key as stored on tasks
    name: String,
    /// Display color for the status badge
    color: String,
    /// Statuses this one may legally transition to (advisory)
    transitions_to: Vec<String>,
}

impl From<&StatusDescriptor> for StatusDescriptorJson {
    fn from(descriptor: &StatusDescriptor) -> Self {
        Self {
            name: descriptor.name.to_string(),
            color: descriptor.color.to_string(),
            transitions_to: descriptor
                .transitions_to
                .iter()
                .map(|target| target.to_string())
                .collect(),
        }
    }
}

/// Handler for GET /api/statuses - Returns the full status catalog.
#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/api/statuses",
    responses(
        (status = 200, description = "The status catalog in fixed order", body = [StatusDescriptorJson])
    ),
    tag = "Statuses"
)]
pub async fn get_statuses_handler() -> Json<Vec<StatusDescriptorJson>> {
    Json(status::all().iter().map(StatusDescriptorJson::from).collect())
}

/// Creates and returns the statuses API router.
pub fn create_api_router() -> Router {
    Router::new().route("/statuses", get(get_statuses_handler))
}
