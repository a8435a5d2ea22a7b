//! Common types used throughout typeauth
//!
//! Wire types for the verification call and the public result types
//! returned by `authenticate`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Documentation URLs
// ============================================================================

/// Documentation for requests that carry no token
pub const MISSING_TOKEN_DOCS: &str = "https://docs.typeauth.com/errors/missing-token";

/// Documentation for every other authentication failure
pub const AUTHENTICATION_ERROR_DOCS: &str =
    "https://docs.typeauth.com/errors/authentication-error";

// ============================================================================
// Wire Types
// ============================================================================

/// Snapshot of the incoming request sent alongside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Full request URL
    pub url: String,
    /// HTTP method
    pub method: String,
    /// All request headers, repeated values joined with ", "
    pub headers: BTreeMap<String, String>,
    /// Client IP from the forwarded-IP header, empty if absent
    pub ipaddress: String,
    /// Capture time in epoch milliseconds
    pub timestamp: i64,
}

/// Body of `POST {base_url}/authenticate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub token: String,
    #[serde(rename = "appID")]
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Telemetry>,
}

/// Decoded body of a successful verification response
///
/// Kept as raw JSON: the verdict is only positive when `success` and
/// `valid` are both literally `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationResponse {
    body: Value,
}

impl VerificationResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// The `success` flag
    pub fn success(&self) -> bool {
        self.flag("success")
    }

    /// The `valid` flag
    pub fn valid(&self) -> bool {
        self.flag("valid")
    }

    /// Both flags set
    pub fn is_verified(&self) -> bool {
        self.success() && self.valid()
    }

    /// Raw response body
    pub fn body(&self) -> &Value {
        &self.body
    }

    fn flag(&self, name: &str) -> bool {
        self.body.get(name) == Some(&Value::Bool(true))
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Failure classes surfaced by `authenticate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// No credential in the configured header
    MissingToken,
    /// Network, DNS or timeout failure, after all retries
    TransportFailure,
    /// Non-success HTTP status from the verification service
    ServiceRejection,
    /// The service answered but did not accept the token
    InvalidVerdict,
    /// Internal fault that ordinary operation never reaches
    Unexpected,
}

impl AuthErrorKind {
    /// Documentation URL advertised for this kind
    pub fn docs_url(self) -> &'static str {
        match self {
            AuthErrorKind::MissingToken => MISSING_TOKEN_DOCS,
            _ => AUTHENTICATION_ERROR_DOCS,
        }
    }
}

/// Structured authentication failure
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct AuthError {
    #[serde(skip)]
    pub kind: AuthErrorKind,
    /// Status returned by the verification service, for rejections
    #[serde(skip)]
    pub status: Option<u16>,
    pub message: String,
    pub docs: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            docs: kind.docs_url().to_string(),
        }
    }

    /// No token found in the request
    pub fn missing_token() -> Self {
        Self::new(AuthErrorKind::MissingToken, "Missing token")
    }

    /// The service did not declare the token valid
    pub fn invalid_verdict() -> Self {
        Self::new(AuthErrorKind::InvalidVerdict, "authentication failed")
    }
}

impl From<crate::error::Error> for AuthError {
    fn from(err: crate::error::Error) -> Self {
        let mut auth_error = Self::new(err.kind(), err.to_string());
        if let crate::error::Error::ServiceRejection { status } = err {
            auth_error.status = Some(status);
        }
        auth_error
    }
}

/// Outcome of `authenticate`
///
/// Serializes as `{"result": true}` or `{"error": {"message", "docs"}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated,
    Failed(AuthError),
}

impl AuthResult {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthResult::Authenticated)
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&AuthError> {
        match self {
            AuthResult::Authenticated => None,
            AuthResult::Failed(err) => Some(err),
        }
    }

    /// Convert into a standard `Result` for `?` chaining
    pub fn into_result(self) -> std::result::Result<(), AuthError> {
        match self {
            AuthResult::Authenticated => Ok(()),
            AuthResult::Failed(err) => Err(err),
        }
    }
}

impl From<AuthError> for AuthResult {
    fn from(err: AuthError) -> Self {
        AuthResult::Failed(err)
    }
}

impl Serialize for AuthResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            AuthResult::Authenticated => map.serialize_entry("result", &true)?,
            AuthResult::Failed(err) => map.serialize_entry("error", err)?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_auth_result_serialization() {
        let ok = serde_json::to_value(AuthResult::Authenticated).unwrap();
        assert_eq!(ok, json!({ "result": true }));

        let failed = serde_json::to_value(AuthResult::Failed(AuthError::missing_token())).unwrap();
        assert_eq!(
            failed,
            json!({
                "error": {
                    "message": "Missing token",
                    "docs": "https://docs.typeauth.com/errors/missing-token"
                }
            })
        );
    }

    #[test]
    fn test_auth_error_docs_by_kind() {
        assert_eq!(AuthError::missing_token().docs, MISSING_TOKEN_DOCS);
        assert_eq!(AuthError::invalid_verdict().docs, AUTHENTICATION_ERROR_DOCS);
        assert_eq!(
            AuthError::new(AuthErrorKind::TransportFailure, "x").docs,
            AUTHENTICATION_ERROR_DOCS
        );
    }

    #[test]
    fn test_auth_error_carries_rejection_status() {
        let err = AuthError::from(crate::error::Error::ServiceRejection { status: 503 });
        assert_eq!(err.kind, AuthErrorKind::ServiceRejection);
        assert_eq!(err.status, Some(503));
        assert_eq!(err.message, "HTTP error! status: 503");

        let err = AuthError::from(crate::error::Error::decode("bad"));
        assert_eq!(err.status, None);

        // Status stays off the wire
        let wire = serde_json::to_value(AuthResult::Failed(
            AuthError::from(crate::error::Error::ServiceRejection { status: 401 }),
        ))
        .unwrap();
        assert_eq!(wire["error"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_auth_result_into_result() {
        assert!(AuthResult::Authenticated.into_result().is_ok());

        let err = AuthResult::from(AuthError::invalid_verdict())
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidVerdict);
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn test_verification_request_wire_shape() {
        let body = VerificationRequest {
            token: "tok".to_string(),
            app_id: "app".to_string(),
            telemetry: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "token": "tok", "appID": "app" })
        );
    }

    #[test]
    fn test_verification_response_flags() {
        let verified = VerificationResponse::new(json!({ "success": true, "valid": true }));
        assert!(verified.is_verified());

        let invalid = VerificationResponse::new(json!({ "success": true, "valid": false }));
        assert!(invalid.success());
        assert!(!invalid.is_verified());

        // Truthy but not boolean true
        let stringly = VerificationResponse::new(json!({ "success": "true", "valid": 1 }));
        assert!(!stringly.is_verified());

        let empty = VerificationResponse::new(json!({}));
        assert!(!empty.success());
        assert!(!empty.valid());
    }
}
