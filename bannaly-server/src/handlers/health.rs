use axum::{Json, extract::State};
use bannaly_core::application::CatalogKind;
use bannaly_core::domain::collections::LoadStatus;
use serde_json::{Value, json};
use tracing::debug;

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    debug!("ping");
    Json(json!({
        "status": "ok",
        "message": "Bannaly backend is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Dependency overview. Always 200; a missing collaborator marks the service
/// `degraded` rather than down because the other endpoints keep working.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let books = state.catalog().is_configured(CatalogKind::Books);
    let audio = state.catalog().is_configured(CatalogKind::Audio);
    let collections = state.collections().get();

    let collection_check = match &collections {
        LoadStatus::Ready {
            collections: loaded,
            error,
        } => json!({
            "status": collections.label(),
            "count": loaded.len(),
            "partial": error.is_some(),
        }),
        other => json!({ "status": other.label() }),
    };

    let degraded = !books
        || !audio
        || matches!(collections, LoadStatus::Failed(_));

    Json(json!({
        "status": if degraded { "degraded" } else { "healthy" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "books": { "configured": books },
            "audio": { "configured": audio },
            "storage": { "backend": state.storage().as_str() },
            "collections": collection_check,
        }
    }))
}

