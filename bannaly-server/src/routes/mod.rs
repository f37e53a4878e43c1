pub mod library;

use axum::Router;
use bannaly_core::api::routes::paths::ROOT;

use crate::infra::app_state::AppState;

/// Create the API router mounted under `/api`
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest(ROOT, library::create_library_router())
}
