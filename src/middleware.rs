//! axum middleware
//!
//! ```rust,ignore
//! use axum::{middleware, routing::get, Router};
//! use typeauth::{middleware::require_auth, Authenticator, AuthenticatorConfig};
//!
//! let auth = Authenticator::new(AuthenticatorConfig::builder("my-app").build()?)?;
//! let app: Router = Router::new()
//!     .route("/orders", get(list_orders))
//!     .route_layer(middleware::from_fn_with_state(auth, require_auth));
//! ```

use crate::auth::Authenticator;
use crate::types::{AuthError, AuthErrorKind, AuthResult};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

/// Reject requests the verification service does not accept
///
/// Failures become `401` with the `{"error": {message, docs}}` body, or
/// `502` when the verification service could not be reached or answered
/// with a server error.
pub async fn require_auth(
    State(auth): State<Authenticator>,
    request: Request,
    next: Next,
) -> Response {
    // Parts is Sync, the body is not
    let (parts, body) = request.into_parts();

    match auth.authenticate(&parts).await {
        AuthResult::Authenticated => next.run(Request::from_parts(parts, body)).await,
        AuthResult::Failed(error) => {
            debug!("Rejecting {} {}: {}", parts.method, parts.uri.path(), error);
            error.into_response()
        }
    }
}

impl AuthError {
    /// Status code used when this error is returned to an HTTP client
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            AuthErrorKind::TransportFailure | AuthErrorKind::Unexpected => StatusCode::BAD_GATEWAY,
            AuthErrorKind::ServiceRejection if self.status.is_some_and(|s| s >= 500) => {
                StatusCode::BAD_GATEWAY
            }
            AuthErrorKind::MissingToken
            | AuthErrorKind::ServiceRejection
            | AuthErrorKind::InvalidVerdict => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(AuthResult::Failed(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthenticatorConfig;
    use axum::body::{to_bytes, Body};
    use axum::routing::get;
    use axum::{middleware, Router};
    use serde_json::{json, Value};
    use std::time::Duration;
    use test_case::test_case;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(base_url: &str) -> Router {
        let config = AuthenticatorConfig::builder("mock-app-id")
            .base_url(base_url)
            .max_retries(2)
            .retry_delay(Duration::from_millis(10))
            .build()
            .unwrap();
        let auth = Authenticator::new(config).unwrap();

        Router::new()
            .route("/protected", get(|| async { "secret" }))
            .route_layer(middleware::from_fn_with_state(auth, require_auth))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = axum::http::Request::builder()
            .uri("/protected")
            .header("host", "localhost");
        if let Some(value) = authorization {
            request = request.header("authorization", value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let (status, body) = call(app("http://127.0.0.1:1"), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "error": {
                    "message": "Missing token",
                    "docs": "https://docs.typeauth.com/errors/missing-token"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_valid_token_passes_through() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authenticate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "valid": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (status, body) = call(app(&mock_server.uri()), Some("Bearer good")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"secret");
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authenticate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "valid": false
            })))
            .mount(&mock_server)
            .await;

        let (status, body) = call(app(&mock_server.uri()), Some("Bearer bad")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["message"], "authentication failed");
    }

    #[test_case(401, StatusCode::UNAUTHORIZED ; "client error rejection")]
    #[test_case(403, StatusCode::UNAUTHORIZED ; "forbidden rejection")]
    #[test_case(500, StatusCode::BAD_GATEWAY ; "internal error")]
    #[test_case(503, StatusCode::BAD_GATEWAY ; "service unavailable")]
    #[tokio::test]
    async fn test_service_rejection_status(upstream: u16, expected: StatusCode) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authenticate"))
            .respond_with(ResponseTemplate::new(upstream))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (status, body) = call(app(&mock_server.uri()), Some("Bearer any")).await;

        assert_eq!(status, expected);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["error"]["message"],
            format!("HTTP error! status: {upstream}")
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_bad_gateway() {
        let (status, body) = call(app("http://127.0.0.1:1"), Some("Bearer any")).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["error"]["docs"],
            "https://docs.typeauth.com/errors/authentication-error"
        );
    }
}
