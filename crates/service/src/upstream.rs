//! HTTP plumbing shared by the adapters that forward to remote services.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::AuthUser;
use crate::errors::ServiceError;

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";
pub const CALLER_EMAIL_HEADER: &str = "x-caller-email";

/// A remote service reachable at `base_url`.
#[derive(Clone, Debug)]
pub struct Upstream {
    client: Client,
    base_url: String,
}

impl Upstream {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::upstream(502, format!("cannot build http client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn client(&self) -> &Client { &self.client }

    /// Absolute URL for `path`, plus extra path segments percent-encoded.
    pub fn url(&self, path: &str, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ServiceError::upstream(502, format!("invalid upstream url: {e}")))?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| ServiceError::upstream(502, "upstream url cannot take path segments"))?
                .extend(segments);
        }
        Ok(url)
    }

    /// Send `req` and decode a 2xx JSON body; anything else becomes a [`ServiceError`].
    pub async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ServiceError> {
        let resp = req.send().await.map_err(|e| {
            warn!(base_url = %self.base_url, err = %e, "upstream unreachable");
            ServiceError::upstream(502, e.to_string())
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(base_url = %self.base_url, err = %e, "upstream error body unreadable");
                    String::new()
                }
            };
            debug!(base_url = %self.base_url, status = status.as_u16(), "upstream returned error");
            return Err(error_from_status(status.as_u16(), &body));
        }
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::upstream(502, format!("invalid upstream payload: {e}")))
    }
}

/// Attach the caller identity headers.
pub fn with_caller(req: RequestBuilder, caller: &AuthUser) -> RequestBuilder {
    let req = req
        .header(CALLER_ID_HEADER, caller.id.as_str())
        .header(CALLER_ROLE_HEADER, caller.role.as_str());
    match &caller.email {
        Some(email) => req.header(CALLER_EMAIL_HEADER, email.as_str()),
        None => req,
    }
}

/// Map an upstream error status and body onto the service error taxonomy.
pub fn error_from_status(status: u16, body: &str) -> ServiceError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    match status {
        400 | 422 => ServiceError::Validation(message),
        404 => ServiceError::NotFound(message),
        _ => ServiceError::Upstream { status, message },
    }
}
