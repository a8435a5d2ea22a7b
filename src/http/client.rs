//! Verification client with flat-delay retry
//!
//! Posts the verification body to `{base_url}/authenticate` and classifies
//! the outcome:
//! - Transport failures (connect, DNS, timeout, body read) are retried
//! - Non-success statuses are returned immediately
//! - Success bodies are decoded as JSON

use crate::config::AuthenticatorConfig;
use crate::error::{Error, Result};
use crate::types::{VerificationRequest, VerificationResponse};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the verification service
#[derive(Debug, Clone)]
pub struct VerificationClient {
    client: Client,
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
    timeout: Duration,
}

impl VerificationClient {
    /// Create a client with its own connection pool
    pub fn new(config: &AuthenticatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(format!("typeauth-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_client(config: &AuthenticatorConfig, client: Client) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
            timeout: config.request_timeout,
        }
    }

    /// Full verification URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `body` to the verification service
    ///
    /// At most `max_retries` attempts are made, with `retry_delay` between
    /// them. Only transport failures consume the retry budget.
    pub async fn verify(&self, body: &VerificationRequest) -> Result<VerificationResponse> {
        let mut attempt = 0;

        while attempt < self.max_retries {
            match self.attempt(body).await {
                Err(err) if err.is_retryable() => {
                    let Error::Http(source) = err else {
                        return Err(err);
                    };
                    attempt += 1;
                    if attempt >= self.max_retries {
                        warn!(
                            "Verification request failed after {} attempts: {}",
                            attempt, source
                        );
                        return Err(Error::RetriesExhausted {
                            attempts: attempt,
                            source,
                        });
                    }

                    warn!(
                        "Verification request failed ({}), attempt {}/{}, retrying in {:?}",
                        source, attempt, self.max_retries, self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                outcome => return outcome,
            }
        }

        Err(Error::Unexpected)
    }

    /// One POST, no retry
    async fn attempt(&self, body: &VerificationRequest) -> Result<VerificationResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Verification service responded with {}", status.as_u16());
            return Err(Error::ServiceRejection {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let json: Value = serde_json::from_slice(&bytes).map_err(|e| Error::decode(e.to_string()))?;

        debug!("Verification succeeded: POST {}", self.endpoint);
        Ok(VerificationResponse::new(json))
    }
}
