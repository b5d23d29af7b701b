use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::license::CompositionError;
use thiserror::Error;
use tracing::error;

/// JSON error shared by every route: `{"status", "error", "message"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": self.status.as_u16(),
            "error": self.title,
            "message": self.detail,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            ServiceError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Upstream { status, message } => {
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                if status.is_server_error() {
                    error!(status = status.as_u16(), err = %message, "delegate failed upstream");
                }
                ApiError::new(status, "Upstream Error", Some(message))
            }
            other => {
                error!(err = %other, "delegate failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(other.to_string()))
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        if e.is_forbidden() {
            ApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some(e.to_string()))
        } else {
            ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(e.to_string()))
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("module composition failed: {0}")]
    Composition(#[from] CompositionError),
    #[error("upstream setup failed: {0}")]
    Upstream(#[from] ServiceError),
}
