//! Response construction.
//!
//! # Responsibilities
//! - Fixed plain-text rejections (400, 404)
//! - Relay buffered upstream responses (status, `Content-Type`, body)
//! - Map upstream failures (redirects included) to 502 / 504
//!
//! # Design Decisions
//! - Gateway-generated errors carry `X-Content-Type-Options: nosniff`
//! - No other upstream header reaches the client

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::upstream::{UpstreamError, UpstreamResponse};

pub const METHOD_NOT_ALLOWED_BODY: &str = "400 Bad request ; only GET allowed.";
pub const NOT_FOUND_BODY: &str = "404 page not found";
pub const BAD_GATEWAY_BODY: &str = "502 Bad gateway ; upstream request failed.";
pub const GATEWAY_TIMEOUT_BODY: &str = "504 Gateway timeout ; upstream did not respond in time.";

fn plain_error(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        )],
        body,
    )
        .into_response()
}

/// Response for a registered path requested with anything but GET.
pub fn method_not_allowed() -> Response {
    plain_error(StatusCode::BAD_REQUEST, METHOD_NOT_ALLOWED_BODY)
}

/// Response for a path no allowed category covers.
pub fn not_found() -> Response {
    plain_error(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Response for a failed upstream round trip.
pub fn upstream_failure(error: &UpstreamError) -> Response {
    match error {
        UpstreamError::Timeout(_) => plain_error(StatusCode::GATEWAY_TIMEOUT, GATEWAY_TIMEOUT_BODY),
        _ => plain_error(StatusCode::BAD_GATEWAY, BAD_GATEWAY_BODY),
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use std::time::Duration;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn method_not_allowed_has_literal_body() {
        let response = method_not_allowed();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "400 Bad request ; only GET allowed.");
    }

    #[tokio::test]
    async fn timeout_maps_to_gateway_timeout() {
        let response = upstream_failure(&UpstreamError::Timeout(Duration::from_secs(1)));
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_text(response).await, GATEWAY_TIMEOUT_BODY);
    }

    #[tokio::test]
    async fn upstream_redirect_is_bad_gateway() {
        let response = upstream_failure(&UpstreamError::Redirect(StatusCode::MOVED_PERMANENTLY));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert_eq!(body_text(response).await, BAD_GATEWAY_BODY);
    }

    #[tokio::test]
    async fn upstream_response_keeps_status_and_content_type() {
        let response = UpstreamResponse {
            status: StatusCode::NOT_FOUND,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: Bytes::from_static(b"{\"message\":\"No such container: x\"}"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_text(response).await, "{\"message\":\"No such container: x\"}");
    }

    #[tokio::test]
    async fn upstream_response_without_content_type_sets_none() {
        let response = UpstreamResponse {
            status: StatusCode::OK,
            content_type: None,
            body: Bytes::from_static(b"OK"),
        }
        .into_response();

        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
