use axum::{
    Router,
    routing::{get, post},
};
use bannaly_core::api::routes::paths::relative;

use crate::handlers::{catalog, collections, comments};
use crate::infra::app_state::AppState;

pub fn create_library_router() -> Router<AppState> {
    Router::new()
        .merge(create_catalog_routes())
        .merge(create_video_routes())
}

fn create_catalog_routes() -> Router<AppState> {
    Router::new()
        .route(relative::BOOKS, get(catalog::list_books))
        .route(relative::BOOK_VIEW, post(catalog::record_view))
        .route(relative::AUDIO, get(catalog::list_audio))
        .route(relative::AUDIO_LIKE, post(catalog::toggle_audio_like))
}

fn create_video_routes() -> Router<AppState> {
    Router::new()
        .route(relative::COLLECTIONS, get(collections::get_collections))
        .route(
            relative::VIDEO_COMMENTS,
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(relative::COMMENT_REACT, post(comments::react_to_comment))
}
