use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::error::{LibraryError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared outbound client. One instance is cloned into every REST adapter.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("bannaly/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Google-style error envelope: `{"error": {"code", "status", "message"}}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GoogleErrorBody {
    #[serde(default)]
    pub error: Option<GoogleError>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GoogleError {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pass successful responses through; turn anything else into an upstream
/// error carrying the remote message when one can be decoded.
pub(crate) async fn ensure_success(
    service: &str,
    response: Response,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LibraryError::upstream(service, describe_failure(status, &body)))
}

pub(crate) fn describe_failure(status: StatusCode, body: &str) -> String {
    let remote = serde_json::from_str::<GoogleErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message.or(error.status));

    match remote {
        Some(message) => format!("{status}: {message}"),
        None if body.trim().is_empty() => format!("request failed with status {status}"),
        None => format!("{status}: {}", truncate(body.trim(), 200)),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
