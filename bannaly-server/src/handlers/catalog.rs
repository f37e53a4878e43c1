use axum::{
    Json,
    extract::{Path, Query, State},
};
use bannaly_core::application::CatalogKind;
use bannaly_core::domain::catalog::{AudioTrack, Book, CatalogListing, PageRequest};
use serde::{Deserialize, Serialize};

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::extract::ApiJson;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordViewRequest {
    #[serde(default)]
    pub book_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CounterResponse {
    pub id: String,
    pub new_count: u64,
}

fn unconfigured(kind: CatalogKind) -> AppError {
    let account = match kind {
        CatalogKind::Books => "BOOK",
        CatalogKind::Audio => "AUDIO",
    };
    AppError::internal(format!(
        "Backend not configured for ImageKit {account} access. Please check server environment variables."
    ))
    .with_detail(format!("ImageKit {account} configuration missing"))
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> AppResult<Json<CatalogListing<Book>>> {
    if !state.catalog().is_configured(CatalogKind::Books) {
        return Err(unconfigured(CatalogKind::Books));
    }

    let listing = state.catalog().list_books(&request).await.map_err(|err| {
        AppError::from(err).describe("Failed to fetch book list from ImageKit")
    })?;
    Ok(Json(listing))
}

pub async fn list_audio(
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> AppResult<Json<CatalogListing<AudioTrack>>> {
    if !state.catalog().is_configured(CatalogKind::Audio) {
        return Err(unconfigured(CatalogKind::Audio));
    }

    let listing = state.catalog().list_audio(&request).await.map_err(|err| {
        AppError::from(err).describe("Failed to fetch audio list from ImageKit")
    })?;
    Ok(Json(listing))
}

pub async fn record_view(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecordViewRequest>,
) -> AppResult<Json<CounterResponse>> {
    let book_id = request.book_id.unwrap_or_default();
    let new_count = state
        .catalog()
        .record_view(&book_id)
        .await
        .map_err(|err| AppError::from(err).describe("Failed to record view"))?;

    Ok(Json(CounterResponse {
        id: book_id.trim().to_string(),
        new_count,
    }))
}

pub async fn toggle_audio_like(
    State(state): State<AppState>,
    Path(audio_id): Path<String>,
    ApiJson(request): ApiJson<ToggleLikeRequest>,
) -> AppResult<Json<CounterResponse>> {
    let new_count = state
        .catalog()
        .toggle_audio_like(&audio_id, request.is_liked)
        .await
        .map_err(|err| AppError::from(err).describe("Failed to update like"))?;

    Ok(Json(CounterResponse {
        id: audio_id.trim().to_string(),
        new_count,
    }))
}
