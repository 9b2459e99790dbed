//! Upstream client.
//!
//! # Responsibilities
//! - Issue GET requests against the privileged socket
//! - Buffer the full response body (management API payloads are bounded)
//! - Surface transport failures and timeouts as typed errors
//!
//! # Design Decisions
//! - One pooled client shared by every request; the connector pins every
//!   connection to the configured socket
//! - The whole round trip, body included, runs under one timeout
//! - Exactly one attempt per request, no retries
//! - Only status, `Content-Type` and body are relayed back
//! - Redirects are failures: without `Location` they are unusable

use std::path::Path;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, Request, StatusCode, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::UpstreamConfig;
use crate::net::UnixConnector;

/// Placeholder origin for forwarded URLs; the connector ignores it.
pub const UPSTREAM_ORIGIN: &str = "http://docker";

/// Errors from a single upstream round trip.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream target: {0}")]
    InvalidTarget(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] axum::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("upstream answered with redirect {0}")]
    Redirect(StatusCode),
}

impl UpstreamError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::InvalidTarget(_) => "invalid_target",
            UpstreamError::Request(e) if e.is_connect() => "connect",
            UpstreamError::Request(_) => "request",
            UpstreamError::Body(_) => "body",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Redirect(_) => "redirect",
        }
    }
}

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Shared client bound to the privileged socket.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<UnixConnector, Body>,
    connector: UnixConnector,
    timeout: Duration,
    max_response_bytes: usize,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let connector = UnixConnector::new(config.socket_path.clone());
        let client = Client::builder(TokioExecutor::new()).build(connector.clone());

        Self {
            client,
            connector,
            timeout: Duration::from_secs(config.timeout_secs),
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Path of the socket every request is sent to.
    pub fn socket_path(&self) -> &Path {
        self.connector.socket_path()
    }

    /// GET `target` (path plus optional query) from the upstream.
    pub async fn get(&self, target: &str) -> Result<UpstreamResponse, UpstreamError> {
        let request = Request::get(format!("{UPSTREAM_ORIGIN}{target}")).body(Body::empty())?;

        tokio::time::timeout(self.timeout, self.round_trip(request))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))?
    }

    async fn round_trip(&self, request: Request<Body>) -> Result<UpstreamResponse, UpstreamError> {
        let response: hyper::Response<hyper::body::Incoming> =
            self.client.request(request).await?;
        let (parts, body) = response.into_parts();

        let content_type = parts.headers.get(header::CONTENT_TYPE).cloned();
        // The body is dropped, and the connection released, on every exit path.
        let body = axum::body::to_bytes(Body::new(body), self.max_response_bytes)
            .await
            .map_err(UpstreamError::Body)?;

        if parts.status.is_redirection() {
            return Err(UpstreamError::Redirect(parts.status));
        }

        Ok(UpstreamResponse {
            status: parts.status,
            content_type,
            body,
        })
    }
}

/// Build the upstream request target from an incoming URI.
///
/// The raw query is re-attached verbatim, and only when it is non-empty.
pub fn forward_target(uri: &Uri) -> String {
    match uri.query().filter(|q| !q.is_empty()) {
        Some(query) => format!("{}?{}", uri.path(), query),
        None => uri.path().to_string(),
    }
}
