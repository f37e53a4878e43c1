use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bannaly_core::domain::collections::{LoadFailure, LoadStatus};
use serde_json::json;

use crate::infra::app_state::AppState;

pub const LOADING_MESSAGE: &str = "Video data is still loading...";
pub const UNCONFIGURED_MESSAGE: &str =
    "Video data is not available due to missing YouTube API key.";
pub const FAILED_MESSAGE: &str = "Failed to load video collections data initially.";

/// Serve the cached collections. The status code tells the frontend whether
/// to retry (202), give up (503) or report a failure (500).
pub async fn get_collections(State(state): State<AppState>) -> Response {
    match state.collections().get() {
        LoadStatus::Loading => (
            StatusCode::ACCEPTED,
            Json(json!({ "message": LOADING_MESSAGE, "collections": [] })),
        )
            .into_response(),
        LoadStatus::Failed(LoadFailure::Unconfigured(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": UNCONFIGURED_MESSAGE, "collections": [] })),
        )
            .into_response(),
        LoadStatus::Failed(LoadFailure::Error(error)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": FAILED_MESSAGE,
                "error": error,
                "collections": [],
            })),
        )
            .into_response(),
        LoadStatus::Ready { collections, .. } => {
            Json(collections.as_slice()).into_response()
        }
    }
}
