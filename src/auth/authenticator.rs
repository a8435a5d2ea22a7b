//! Authenticator implementation
//!
//! Runs the whole `authenticate` chain: extract the token, build the
//! verification body, dispatch it with retry and interpret the verdict.

use super::request::IncomingRequest;
use super::token::extract_token;
use crate::config::AuthenticatorConfig;
use crate::error::Result;
use crate::http::VerificationClient;
use crate::types::{AuthError, AuthResult, Telemetry, VerificationRequest};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};

/// Authenticates incoming requests against the verification service
///
/// Cheap to clone; clones share the config and the connection pool.
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: Arc<AuthenticatorConfig>,
    client: VerificationClient,
}

impl Authenticator {
    /// Create an authenticator with its own HTTP client
    pub fn new(config: AuthenticatorConfig) -> Result<Self> {
        config.validate()?;
        let client = VerificationClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create an authenticator sharing an existing `reqwest::Client`
    pub fn with_client(config: AuthenticatorConfig, http_client: Client) -> Result<Self> {
        config.validate()?;
        let client = VerificationClient::with_client(&config, http_client);
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// The validated configuration
    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    /// Read the token from the configured header
    pub fn extract_token<R>(&self, request: &R) -> Option<String>
    where
        R: IncomingRequest + ?Sized,
    {
        extract_token(request.headers(), &self.config.token_header)
    }

    /// Build the verification body for `token`
    pub fn build_request<R>(&self, request: &R, token: String) -> VerificationRequest
    where
        R: IncomingRequest + ?Sized,
    {
        let telemetry = self
            .config
            .telemetry
            .then(|| Telemetry::capture(request, &self.config.client_ip_header));

        VerificationRequest {
            token,
            app_id: self.config.app_id.clone(),
            telemetry,
        }
    }

    /// Authenticate `request`
    ///
    /// Never fails in the Rust sense: every failure mode is folded into
    /// [`AuthResult::Failed`]. Dropping the future cancels the in-flight
    /// attempt and any remaining retries.
    pub async fn authenticate<R>(&self, request: &R) -> AuthResult
    where
        R: IncomingRequest + Sync + ?Sized,
    {
        let Some(token) = self.extract_token(request) else {
            debug!(
                "No token in '{}' header for {} {}",
                self.config.token_header,
                request.method(),
                request.uri().path()
            );
            return AuthResult::Failed(AuthError::missing_token());
        };

        let body = self.build_request(request, token);

        match self.client.verify(&body).await {
            Ok(response) if response.is_verified() => {
                debug!("Token verified for app '{}'", self.config.app_id);
                AuthResult::Authenticated
            }
            Ok(response) => {
                debug!(
                    "Token rejected (success={}, valid={})",
                    response.success(),
                    response.valid()
                );
                AuthResult::Failed(AuthError::invalid_verdict())
            }
            Err(e) => {
                warn!("Token verification failed: {}", e);
                AuthResult::Failed(AuthError::from(e))
            }
        }
    }
}
