//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum app: every request lands in the pass-through handler
//! - Wire up middleware (request ID, request spans)
//! - Serve HTTP/1.1 over the listening Unix socket
//! - Enforce the allowlist and GET-only gate, then forward upstream
//! - Stop accepting immediately when shutdown fires

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::UnixListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::UpstreamConfig;
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response;
use crate::http::upstream::{forward_target, UpstreamClient};
use crate::observability::metrics;
use crate::routing::{AllowedSet, Router as AclRouter};

/// Application state injected into handlers.
///
/// Both members are built before the first request and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<AclRouter>,
    pub upstream: UpstreamClient,
}

/// HTTP front of the gateway.
pub struct HttpServer {
    app: Router,
}

impl HttpServer {
    /// Build the server for the given allowlist and upstream.
    pub fn new(allowed: &AllowedSet, upstream: &UpstreamConfig) -> Self {
        let router = Arc::new(AclRouter::new(allowed));
        tracing::info!(
            categories = allowed.len(),
            patterns = router.len(),
            upstream = %upstream.socket_path.display(),
            "Routes compiled"
        );
        for route in router.routes() {
            tracing::debug!(category = %route.category, pattern = %route.template, "Allowed pattern (also under /vX.Y)");
        }

        let state = AppState {
            router,
            upstream: UpstreamClient::new(upstream),
        };
        Self {
            app: Self::build_app(state),
        }
    }

    /// Build the Axum app with all middleware layers.
    pub fn build_app(state: AppState) -> Router {
        Router::new()
            .fallback(pass_through)
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The underlying app, for driving requests without a socket.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Serve connections until `shutdown` fires.
    ///
    /// Returning drops the listener, which closes the socket; connections
    /// still in flight are not waited for.
    pub async fn run(
        self,
        listener: UnixListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!("HTTP server starting");

        tokio::select! {
            result = axum::serve(listener, self.app).into_future() => result?,
            _ = shutdown.recv() => {
                tracing::info!("Shutdown requested, closing listener");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Pass-through handler shared by every registered pattern.
///
/// Order: allowlist match (404), method gate (400), forward (502/504 on
/// failure, otherwise the upstream status and body).
async fn pass_through(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let Some(route) = state.router.match_path(uri.path()) else {
        tracing::warn!(method = %method, path = %uri.path(), "No allowed route matched");
        let response = response::not_found();
        metrics::record_request(method.as_str(), response.status().as_u16(), "none", start);
        return response;
    };
    let category = route.category.name();

    if method != Method::GET {
        tracing::warn!(
            method = %method,
            path = %uri.path(),
            category,
            "Rejected non-GET request"
        );
        let response = response::method_not_allowed();
        metrics::record_request(method.as_str(), response.status().as_u16(), category, start);
        return response;
    }

    let target = forward_target(&uri);
    tracing::debug!(
        forward = %target,
        category,
        template = route.template,
        version = ?route.version.map(|v| v.to_string()),
        "Forwarding request"
    );

    let response = match state.upstream.get(&target).await {
        Ok(upstream) => {
            tracing::debug!(
                status = %upstream.status,
                bytes = upstream.body.len(),
                "Upstream responded"
            );
            upstream.into_response()
        }
        Err(e) => {
            tracing::error!(
                forward = %target,
                socket = %state.upstream.socket_path().display(),
                kind = e.kind(),
                error = %e,
                "Upstream error"
            );
            metrics::record_upstream_error(e.kind());
            response::upstream_failure(&e)
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), category, start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn app(allow: &[&str], dir: &std::path::Path) -> Router {
        let allowed = AllowedSet::parse(allow).unwrap();
        let upstream = UpstreamConfig {
            socket_path: dir.join("absent.sock"),
            ..UpstreamConfig::default()
        };
        HttpServer::new(&allowed, &upstream).app()
    }

    async fn call(app: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn unmatched_path_is_not_found_before_method_check() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(app(&["ping"], dir.path()), Method::POST, "/containers/create").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, response::NOT_FOUND_BODY);
    }

    #[tokio::test]
    async fn matched_path_rejects_other_methods() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(app(&["volumes"], dir.path()), Method::DELETE, "/v1.41/volumes/data").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "400 Bad request ; only GET allowed.");
    }

    #[tokio::test]
    async fn matched_get_with_dead_upstream_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(app(&["networks"], dir.path()), Method::GET, "/networks/bridge").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, response::BAD_GATEWAY_BODY);
    }

    #[tokio::test]
    async fn request_id_is_set_on_every_response() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/nowhere")
            .header(X_REQUEST_ID, "caller-supplied")
            .body(Body::empty())
            .unwrap();
        let response = app(&["ping"], dir.path()).oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "caller-supplied");
    }
}
