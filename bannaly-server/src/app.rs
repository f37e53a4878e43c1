use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use bannaly_config::CorsConfig;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::handlers::health::{health_handler, ping_handler};
use crate::infra::{app_state::AppState, errors};
use crate::routes;

pub fn create_app(state: AppState) -> Router {
    errors::set_expose_detail(state.config().dev_mode);

    // Permissive in dev, allow-list otherwise
    let cors_layer = if state.config().dev_mode {
        CorsLayer::permissive()
    } else {
        cors_from_config(&state.config().cors)
    };

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .merge(routes::create_api_router())
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_from_config(cors: &CorsConfig) -> CorsLayer {
    let allow_origin = if cors.is_wildcard_included() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    let headers: [HeaderName; 2] = [header::CONTENT_TYPE, header::ACCEPT];
    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(headers);

    if cors.allow_credentials {
        layer.allow_credentials(true)
    } else {
        layer
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bannaly_config::EnvConfig;
    use bannaly_config::loader::compose_config;
    use bannaly_core::infra::HttpTextFetcher;
    use tower::ServiceExt;

    use super::*;
    use crate::infra::wiring::{Collaborators, Stores, assemble};

    fn state(env: EnvConfig) -> AppState {
        let config = compose_config(None, env, None, false).unwrap().config;
        let services = assemble(
            &config,
            Collaborators {
                books: None,
                audio: None,
                text: Arc::new(HttpTextFetcher::new(reqwest::Client::new())),
                playlists: None,
            },
            Stores::in_memory(),
        );
        AppState::new(Arc::new(config), services)
    }

    #[tokio::test]
    async fn ping_responds_ok() {
        let app = create_app(state(EnvConfig::default()));
        let response = app
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn listed_origin_is_echoed_back() {
        let app = create_app(state(EnvConfig {
            cors_allowed_origins: Some(vec!["https://library.example".into()]),
            ..Default::default()
        }));
        let response = app
            .oneshot(
                Request::get("/ping")
                    .header(header::ORIGIN, "https://library.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://library.example"))
        );
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_cors_header() {
        let app = create_app(state(EnvConfig::default()));
        let response = app
            .oneshot(
                Request::get("/ping")
                    .header(header::ORIGIN, "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
