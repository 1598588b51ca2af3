//! HTTP client for the Medical Gallery API.
//!
//! Every endpoint responds with the uniform envelope
//! `{ success, message, data }`. This module owns the envelope decoding
//! rules: a failure envelope and a non-2xx status are the same thing to
//! callers, the server's `message` wins when present, and a body that does
//! not parse is reported with a generic message rather than a panic.

mod auth;
mod error;
mod portal;
mod records;

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::{ApiError, ApiErrorKind, ApiResult, GENERIC_FAILURE};
pub use records::UploadRequest;

/// Standard User-Agent header for portal API requests.
pub const USER_AGENT: &str = concat!("medgal/", env!("CARGO_PKG_VERSION"));

/// Request timeout, covering binary downloads too.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Uniform response envelope used by all endpoints.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Shared HTTP client bound to a single base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    /// Fails if the URL does not parse or the TLS backend can't initialize.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid API base URL: {base_url}"))?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, for the rare call outside the API
    /// (the identity provider's userinfo endpoint).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn transport_error(&self, err: &reqwest::Error) -> ApiError {
        tracing::warn!(error = %err, "request could not reach the server");
        ApiError::transport(&self.base_url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        decode_envelope(path, response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        decode_envelope(path, response).await
    }

    /// POST with a JSON body where only the acknowledgement matters.
    /// Returns the server's message, if it sent one.
    pub(crate) async fn post_ack<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Option<String>> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        decode_ack(path, response).await
    }

    /// POST with no body, for action endpoints keyed entirely by the path.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        decode_envelope(path, response).await
    }

    pub(crate) async fn put_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Option<String>> {
        let response = self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        decode_ack(path, response).await
    }

    /// POST a multipart form where only the acknowledgement matters.
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<Option<String>> {
        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        decode_ack(path, response).await
    }

    /// GET returning only the response status (health check).
    pub(crate) async fn raw_get_status(&self, path: &str) -> ApiResult<reqwest::StatusCode> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        Ok(response.status())
    }

    /// GET returning the raw body (record preview/download).
    pub(crate) async fn get_bytes(&self, path: &str) -> ApiResult<bytes::Bytes> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        if !status.is_success() {
            // Failure bodies on binary endpoints are envelopes too.
            let body = response.text().await.unwrap_or_default();
            return Err(rejection_from_body(status.as_u16(), &body));
        }
        response.bytes().await.map_err(|e| {
            tracing::warn!(path, error = %e, "failed to read response body");
            ApiError::decode()
        })
    }
}

/// Applies the envelope decoding rules to a JSON response.
async fn decode_envelope<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        tracing::warn!(path, error = %e, "failed to read response body");
        ApiError::decode()
    })?;

    if !status.is_success() {
        return Err(rejection_from_body(status.as_u16(), &body));
    }

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(path, error = %e, "response body did not parse");
        ApiError::decode()
    })?;

    if !envelope.success {
        return Err(ApiError::rejected(envelope.message));
    }
    envelope.data.ok_or_else(|| {
        tracing::warn!(path, "success envelope was missing its data payload");
        ApiError::decode()
    })
}

/// Like [`decode_envelope`] but for endpoints whose payload is irrelevant.
async fn decode_ack(path: &str, response: reqwest::Response) -> ApiResult<Option<String>> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        tracing::warn!(path, error = %e, "failed to read response body");
        ApiError::decode()
    })?;

    if !status.is_success() {
        return Err(rejection_from_body(status.as_u16(), &body));
    }

    let envelope: Envelope<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(path, error = %e, "response body did not parse");
        ApiError::decode()
    })?;

    if !envelope.success {
        return Err(ApiError::rejected(envelope.message));
    }
    Ok(envelope.message)
}

/// Builds the rejection for a non-2xx response, digging the server message
/// out of the body when it still parses as an envelope.
fn rejection_from_body(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|env| env.message);
    tracing::debug!(status, has_message = message.is_some(), "server rejected request");
    ApiError::rejected(message)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::types::Identity;

    fn identity_json() -> serde_json::Value {
        serde_json::json!({
            "userId": 1,
            "name": "Ada",
            "email": "ada@example.com",
            "userType": "PATIENT",
            "accessCode": "AC-1"
        })
    }

    #[tokio::test]
    async fn test_success_envelope_yields_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": identity_json()
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let identity: Identity = client.get_json("/thing").await.unwrap();
        assert_eq!(identity.name, "Ada");
    }

    #[tokio::test]
    async fn test_failure_envelope_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "message": "No such user"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.get_json::<Identity>("/thing").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.message, "No such user");
    }

    #[tokio::test]
    async fn test_non_2xx_is_a_rejection_with_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Bad request"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.get_json::<Identity>("/thing").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.message, "Bad request");
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.get_json::<Identity>("/thing").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
        assert_eq!(err.message, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        // Port 9 (discard) is almost certainly closed.
        let client = ApiClient::new("http://127.0.0.1:9/api").unwrap();
        let err = client.get_json::<Identity>("/thing").await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.message.contains("127.0.0.1:9"));
    }
}
