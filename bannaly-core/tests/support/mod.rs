//! A scripted HTTP upstream on an ephemeral port. Every request is recorded
//! and answered by the test's responder closure.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Raw path, still percent-encoded.
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    /// JSON body, or `Null` for empty and non-JSON bodies.
    pub body: Value,
    pub raw_body: String,
}

type Responder = dyn Fn(&Recorded) -> (StatusCode, Value) + Send + Sync;

struct Shared {
    respond: Box<Responder>,
    requests: Mutex<Vec<Recorded>>,
}

#[derive(Clone)]
pub struct FakeUpstream {
    pub base_url: String,
    shared: Arc<Shared>,
}

impl FakeUpstream {
    pub async fn start<F>(respond: F) -> Result<Self>
    where
        F: Fn(&Recorded) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new()
            .fallback(record_and_respond)
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            shared,
        })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().clone()
    }

    /// Requests whose path ends with `suffix`.
    pub fn hits(&self, suffix: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path.ends_with(suffix))
            .collect()
    }
}

async fn record_and_respond(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let raw_body = String::from_utf8_lossy(&body).into_owned();
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        raw_body,
    };

    let (status, reply) = (shared.respond)(&recorded);
    shared.requests.lock().push(recorded);
    (status, Json(reply)).into_response()
}
