//! Authenticator configuration
//!
//! `AuthenticatorConfig` is built once, validated, and then shared read-only
//! by every `authenticate` call. Defaults are applied here and nowhere else.
//!
//! Settings can come from three places, merged in this order:
//!
//! 1. A YAML or JSON file ([`AuthenticatorSettings::from_file`])
//! 2. `TYPEAUTH_*` environment variables ([`AuthenticatorSettings::with_env`])
//! 3. Explicit overrides, usually CLI flags ([`AuthenticatorSettings::merge`])

use crate::error::{Error, Result};
use http::HeaderName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default verification service
pub const DEFAULT_BASE_URL: &str = "https://api.typeauth.com";

/// Default header carrying the token
pub const DEFAULT_TOKEN_HEADER: &str = "Authorization";

/// Default header carrying the client IP
pub const DEFAULT_CLIENT_IP_HEADER: &str = "x-forwarded-for";

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Validated Config
// ============================================================================

/// Validated authenticator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorConfig {
    /// Application identifier sent as `appID`
    pub app_id: String,
    /// Verification service base URL
    pub base_url: String,
    /// Header the token is read from
    pub token_header: String,
    /// Whether request telemetry is sent
    pub telemetry: bool,
    /// Total attempts per verification, at least 1
    pub max_retries: u32,
    /// Flat delay between attempts
    pub retry_delay: Duration,
    /// Timeout for a single attempt
    pub request_timeout: Duration,
    /// Header the client IP is read from
    pub client_ip_header: String,
}

impl AuthenticatorConfig {
    /// Create a new config builder
    pub fn builder(app_id: impl Into<String>) -> AuthenticatorConfigBuilder {
        AuthenticatorConfigBuilder::new(app_id)
    }

    /// Check every field
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(Error::missing_field("app_id"));
        }

        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        validate_header_name("token_header", &self.token_header)?;
        validate_header_name("client_ip_header", &self.client_ip_header)?;

        if self.max_retries == 0 {
            return Err(Error::invalid_value(
                "max_retries",
                "at least one attempt is required",
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::invalid_value("request_timeout", "must be non-zero"));
        }

        Ok(())
    }

    /// `{base_url}/authenticate`
    pub fn endpoint(&self) -> String {
        format!("{}/authenticate", self.base_url.trim_end_matches('/'))
    }
}

fn validate_header_name(field: &str, name: &str) -> Result<()> {
    HeaderName::from_bytes(name.as_bytes())
        .map(|_| ())
        .map_err(|e| Error::invalid_value(field, format!("'{name}' is not a header name: {e}")))
}

/// Builder for authenticator config
#[derive(Debug, Clone)]
pub struct AuthenticatorConfigBuilder {
    config: AuthenticatorConfig,
}

impl AuthenticatorConfigBuilder {
    fn new(app_id: impl Into<String>) -> Self {
        Self {
            config: AuthenticatorConfig {
                app_id: app_id.into(),
                base_url: DEFAULT_BASE_URL.to_string(),
                token_header: DEFAULT_TOKEN_HEADER.to_string(),
                telemetry: true,
                max_retries: DEFAULT_MAX_RETRIES,
                retry_delay: DEFAULT_RETRY_DELAY,
                request_timeout: DEFAULT_REQUEST_TIMEOUT,
                client_ip_header: DEFAULT_CLIENT_IP_HEADER.to_string(),
            },
        }
    }

    /// Set the verification service base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the header the token is read from
    #[must_use]
    pub fn token_header(mut self, header: impl Into<String>) -> Self {
        self.config.token_header = header.into();
        self
    }

    /// Stop sending request telemetry
    #[must_use]
    pub fn disable_telemetry(mut self, disable: bool) -> Self {
        self.config.telemetry = !disable;
        self
    }

    /// Set total attempts per verification
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the delay between attempts
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the header the client IP is read from
    #[must_use]
    pub fn client_ip_header(mut self, header: impl Into<String>) -> Self {
        self.config.client_ip_header = header.into();
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<AuthenticatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// Settings (file / env / CLI)
// ============================================================================

/// Partial settings as loaded from a file, the environment or flags
///
/// Every field is optional; missing fields take the builder defaults.
/// camelCase keys are accepted alongside snake_case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatorSettings {
    #[serde(default, alias = "appId", alias = "appID")]
    pub app_id: Option<String>,

    #[serde(default, alias = "baseUrl")]
    pub base_url: Option<String>,

    #[serde(default, alias = "tokenHeader")]
    pub token_header: Option<String>,

    #[serde(default, alias = "disableTelemetry")]
    pub disable_telemetry: Option<bool>,

    #[serde(default, alias = "maxRetries")]
    pub max_retries: Option<u32>,

    /// Delay between attempts in milliseconds
    #[serde(default, alias = "retryDelay")]
    pub retry_delay_ms: Option<u64>,

    /// Per-attempt timeout in milliseconds
    #[serde(default, alias = "requestTimeout")]
    pub request_timeout_ms: Option<u64>,

    #[serde(default, alias = "clientIpHeader")]
    pub client_ip_header: Option<String>,
}

impl AuthenticatorSettings {
    /// Parse settings from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a file, JSON if the extension is `.json`, YAML otherwise
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let settings = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        settings.map_err(|e| Error::config(format!("Failed to load {}: {e}", path.display())))
    }

    /// Apply `TYPEAUTH_*` environment variables
    pub fn with_env(self) -> Result<Self> {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Apply `TYPEAUTH_*` variables from an arbitrary lookup
    pub fn with_env_lookup<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Self {
            app_id: lookup("TYPEAUTH_APP_ID"),
            base_url: lookup("TYPEAUTH_BASE_URL"),
            token_header: lookup("TYPEAUTH_TOKEN_HEADER"),
            disable_telemetry: lookup("TYPEAUTH_DISABLE_TELEMETRY")
                .map(|v| parse_env("TYPEAUTH_DISABLE_TELEMETRY", &v, parse_bool))
                .transpose()?,
            max_retries: lookup("TYPEAUTH_MAX_RETRIES")
                .map(|v| parse_env("TYPEAUTH_MAX_RETRIES", &v, |s| s.parse::<u32>().ok()))
                .transpose()?,
            retry_delay_ms: lookup("TYPEAUTH_RETRY_DELAY_MS")
                .map(|v| parse_env("TYPEAUTH_RETRY_DELAY_MS", &v, |s| s.parse::<u64>().ok()))
                .transpose()?,
            request_timeout_ms: lookup("TYPEAUTH_REQUEST_TIMEOUT_MS")
                .map(|v| parse_env("TYPEAUTH_REQUEST_TIMEOUT_MS", &v, |s| s.parse::<u64>().ok()))
                .transpose()?,
            client_ip_header: lookup("TYPEAUTH_CLIENT_IP_HEADER"),
        };
        Ok(self.merge(env))
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            app_id: other.app_id.or(self.app_id),
            base_url: other.base_url.or(self.base_url),
            token_header: other.token_header.or(self.token_header),
            disable_telemetry: other.disable_telemetry.or(self.disable_telemetry),
            max_retries: other.max_retries.or(self.max_retries),
            retry_delay_ms: other.retry_delay_ms.or(self.retry_delay_ms),
            request_timeout_ms: other.request_timeout_ms.or(self.request_timeout_ms),
            client_ip_header: other.client_ip_header.or(self.client_ip_header),
        }
    }

    /// Apply defaults and validate
    pub fn into_config(self) -> Result<AuthenticatorConfig> {
        let app_id = self.app_id.ok_or_else(|| Error::missing_field("app_id"))?;
        let mut builder = AuthenticatorConfig::builder(app_id);

        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(header) = self.token_header {
            builder = builder.token_header(header);
        }
        if let Some(disable) = self.disable_telemetry {
            builder = builder.disable_telemetry(disable);
        }
        if let Some(retries) = self.max_retries {
            builder = builder.max_retries(retries);
        }
        if let Some(ms) = self.retry_delay_ms {
            builder = builder.retry_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = self.request_timeout_ms {
            builder = builder.request_timeout(Duration::from_millis(ms));
        }
        if let Some(header) = self.client_ip_header {
            builder = builder.client_ip_header(header);
        }

        builder.build()
    }
}

fn parse_env<T>(key: &str, value: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    parse(value.trim()).ok_or_else(|| Error::invalid_value(key, format!("cannot parse '{value}'")))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
