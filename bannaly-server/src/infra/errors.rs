use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bannaly_core::LibraryError;
use serde_json::{Value, json};

pub type AppResult<T> = Result<T, AppError>;

static EXPOSE_DETAIL: AtomicBool = AtomicBool::new(false);

/// Include raw error detail in response bodies. Enabled in dev mode only.
pub fn set_expose_detail(expose: bool) {
    EXPOSE_DETAIL.store(expose, Ordering::Relaxed);
}

pub fn expose_detail() -> bool {
    EXPOSE_DETAIL.load(Ordering::Relaxed)
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Underlying cause; only rendered when detail exposure is on.
    pub detail: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Replace the message of a server-side failure with one describing the
    /// operation. Client errors keep their own message.
    pub fn describe(mut self, message: impl Into<String>) -> Self {
        if self.status.is_server_error() {
            self.message = message.into();
        }
        self
    }

    pub fn body(&self, expose_detail: bool) -> Value {
        let mut body = json!({ "message": self.message });
        if expose_detail && let Some(detail) = &self.detail {
            body["error"] = json!(detail);
        }
        body
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                message = %self.message,
                detail = self.detail.as_deref().unwrap_or_default(),
                "request failed"
            );
        }
        let body = Json(self.body(expose_detail()));
        (self.status, body).into_response()
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        let detail = err.to_string();
        match err {
            LibraryError::Validation(msg) => Self::bad_request(msg),
            LibraryError::NotFound(_) => Self::not_found(detail),
            LibraryError::ConfigurationMissing(_) => {
                Self::internal("Backend not configured").with_detail(detail)
            }
            LibraryError::Upstream(_) | LibraryError::Network(_) => {
                Self::internal("Upstream service failed").with_detail(detail)
            }
            LibraryError::Serialization(_) | LibraryError::Internal(_) => {
                Self::internal("Internal Server Error").with_detail(detail)
            }
        }
    }
}
