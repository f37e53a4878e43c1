use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bannaly_core::domain::comments::{CommentNode, NewComment};
use serde::{Deserialize, Serialize};

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::extract::ApiJson;

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReactResponse {
    pub id: String,
    pub new_like_count: u64,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<Vec<CommentNode>>> {
    let tree = state
        .comments()
        .list_tree(&video_id)
        .await
        .map_err(|err| AppError::from(err).describe("Failed to fetch comments"))?;
    Ok(Json(tree))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    ApiJson(submission): ApiJson<NewComment>,
) -> AppResult<(StatusCode, Json<CommentNode>)> {
    let node = state
        .comments()
        .add(&video_id, submission)
        .await
        .map_err(|err| AppError::from(err).describe("Failed to add comment"))?;
    Ok((StatusCode::CREATED, Json(node)))
}

pub async fn react_to_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    ApiJson(request): ApiJson<ReactRequest>,
) -> AppResult<Json<ReactResponse>> {
    let new_like_count = state
        .comments()
        .react(&comment_id, request.kind.as_deref())
        .await
        .map_err(|err| AppError::from(err).describe("Failed to record reaction"))?;

    Ok(Json(ReactResponse {
        id: comment_id.trim().to_string(),
        new_like_count,
    }))
}
