use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::session::Session;

/// HTTP client for the booking backend.
///
/// Holds no credentials; every call takes the [`Session`] whose token (if
/// any) is sent as a bearer token. Calls without a token still go out and
/// the backend decides whether to reject them.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client using the HTTP library's default timeouts
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json(&self, session: &Session, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(session, self.client.get(&url)).await
    }

    pub(crate) async fn get_json_with_query<Q: Serialize + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        query: &Q,
    ) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(session, self.client.get(&url).query(query)).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.url(path);
        debug!("POST {}", url);
        self.send(session, self.client.post(&url).json(body)).await
    }

    /// POST with no request body (state transitions)
    pub(crate) async fn post_empty(&self, session: &Session, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("POST {}", url);
        self.send(session, self.client.post(&url)).await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.url(path);
        debug!("PATCH {}", url);
        self.send(session, self.client.patch(&url).json(body)).await
    }

    async fn send(&self, session: &Session, request: RequestBuilder) -> Result<Value> {
        let mut request = request.header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = session.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(status, &text);
            warn!("API error: {} - {}", status, message);
            return Err(ApiError::Http { status, message });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Pick the user-facing message out of an error response body.
///
/// Order: `{"detail": ..}`, then `{"message": ..}`, then the raw body (a bare
/// JSON string is unquoted), then a generic `HTTP <status>`.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {}", status.as_u16());
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            for key in ["detail", "message"] {
                match map.get(key) {
                    Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
                    // validation errors carry a list of problems under detail
                    Some(v @ (Value::Array(_) | Value::Object(_))) => return v.to_string(),
                    _ => {}
                }
            }
            body.to_string()
        }
        Ok(Value::String(s)) if !s.trim().is_empty() => s,
        _ => body.to_string(),
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
