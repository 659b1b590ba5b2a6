//! HTTP transport abstraction.
//!
//! Pipeline steps talk to the network only through [`HttpTransport`], so the
//! orchestrator can be driven by a scripted transport in tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// `User-Agent` sent on every pipeline request.
pub const USER_AGENT: &str = concat!("memefier/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Failures that happen before a status line is received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Failed(String),
}

/// Outbound HTTP used by the pipeline.
///
/// Uses `async_trait` because the orchestrator holds an `Arc<dyn HttpTransport>`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body with a bearer token.
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;

    /// PUT raw bytes with the given content type and no authorization header.
    async fn put_bytes(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Client identifying itself as [`USER_AGENT`].
    pub fn with_user_agent() -> crate::Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client))
    }

    async fn finish(
        request: reqwest::RequestBuilder,
    ) -> Result<HttpResponse, TransportError> {
        let resp = request.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Failed(e.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let request = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .timeout(timeout);
        Self::finish(request).await
    }

    async fn put_bytes(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let request = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .timeout(timeout);
        Self::finish(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_response_helpers() {
        let resp = HttpResponse::new(201, r#"{"imageId":"img-1"}"#);
        assert!(resp.is_success());
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["imageId"], "img-1");

        let resp = HttpResponse::new(504, "gateway timeout");
        assert!(!resp.is_success());
        assert_eq!(resp.text(), "gateway timeout");
    }

    #[tokio::test]
    async fn test_post_json_sends_bearer_and_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pipeline/generate-presigned-url")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(
                serde_json::json!({"contentType": "image/png"}),
            ))
            .with_status(200)
            .with_body(r#"{"presignedUrl":"p","cdnUrl":"c"}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new();
        let url = format!("{}/pipeline/generate-presigned-url", server.url());
        let resp = transport
            .post_json(
                &url,
                "test-token",
                &serde_json::json!({"contentType": "image/png"}),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.text(), r#"{"presignedUrl":"p","cdnUrl":"c"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/ping")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .create_async()
            .await;

        let transport = ReqwestTransport::with_user_agent().unwrap();
        let url = format!("{}/ping", server.url());
        let resp = transport
            .post_json(&url, "t", &serde_json::json!({}), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert!(USER_AGENT.starts_with("memefier/"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_bytes_sets_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/upload/abc")
            .match_header("content-type", "image/jpeg")
            .match_body(vec![0xFF, 0xD8, 0xFF])
            .with_status(200)
            .create_async()
            .await;

        let transport = ReqwestTransport::new();
        let url = format!("{}/upload/abc", server.url());
        let resp = transport
            .put_bytes(&url, "image/jpeg", vec![0xFF, 0xD8, 0xFF], Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/pipeline/generate-captions")
            .with_status(504)
            .with_body("upstream timed out")
            .create_async()
            .await;

        let transport = ReqwestTransport::new();
        let url = format!("{}/pipeline/generate-captions", server.url());
        let resp = transport
            .post_json(&url, "t", &serde_json::json!({}), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(resp.status, 504);
        assert_eq!(resp.text(), "upstream timed out");
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_failed() {
        let transport = ReqwestTransport::new();
        let err = transport
            .post_json(
                "http://127.0.0.1:1/unreachable",
                "t",
                &serde_json::json!({}),
                Duration::from_secs(5),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Failed(_)));
    }
}
