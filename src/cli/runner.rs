//! CLI runner - executes commands

use crate::auth::{Authenticator, BEARER_PREFIX};
use crate::cli::commands::{Cli, Commands};
use crate::config::{AuthenticatorConfig, AuthenticatorSettings};
use crate::error::{Error, Result};
use http::header::AUTHORIZATION;
use http::Request;
use std::process::ExitCode;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<ExitCode> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Verify {
                token,
                headers,
                url,
                method,
            } => {
                self.verify(config, token.as_deref(), headers, url, method)
                    .await
            }
            Commands::Serve { port } => {
                let auth = Authenticator::new(config)?;
                crate::cli::serve(auth, *port).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    /// Resolve settings: file, then environment, then flags
    fn load_config(&self) -> Result<AuthenticatorConfig> {
        let file = match &self.cli.config {
            Some(path) => AuthenticatorSettings::from_file(path)?,
            None => AuthenticatorSettings::default(),
        };

        file.with_env()?.merge(self.cli.settings()).into_config()
    }

    /// Authenticate a synthetic request and print the result as JSON
    async fn verify(
        &self,
        config: AuthenticatorConfig,
        token: Option<&str>,
        headers: &[String],
        url: &str,
        method: &str,
    ) -> Result<ExitCode> {
        let request = build_request(&config.token_header, token, headers, url, method)?;
        let auth = Authenticator::new(config)?;

        info!("Verifying token against {}", auth.config().endpoint());
        let result = auth.authenticate(&request).await;

        println!("{}", serde_json::to_string_pretty(&result)?);

        Ok(if result.is_authenticated() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

/// Build the request `verify` authenticates
fn build_request(
    token_header: &str,
    token: Option<&str>,
    headers: &[String],
    url: &str,
    method: &str,
) -> Result<Request<()>> {
    let mut builder = Request::builder().method(method).uri(url);

    for raw in headers {
        let (name, value) = raw.split_once(':').ok_or_else(|| {
            Error::config(format!("Invalid header '{raw}', expected 'Name: value'"))
        })?;
        builder = builder.header(name.trim(), value.trim());
    }

    if let Some(token) = token {
        let value = if token_header.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
            format!("{BEARER_PREFIX}{token}")
        } else {
            token.to_string()
        };
        builder = builder.header(token_header, value);
    }

    builder
        .body(())
        .map_err(|e| Error::config(format!("Invalid request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::extract_token;

    #[test]
    fn test_build_request_bearer_token() {
        let request =
            build_request("Authorization", Some("abc"), &[], "http://localhost/", "GET").unwrap();

        assert_eq!(request.headers()["authorization"], "Bearer abc");
        assert_eq!(
            extract_token(request.headers(), "Authorization").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_build_request_custom_header() {
        let headers = vec!["X-Forwarded-For: 10.1.2.3".to_string()];
        let request = build_request(
            "X-Api-Key",
            Some("abc"),
            &headers,
            "http://localhost/x",
            "POST",
        )
        .unwrap();

        assert_eq!(request.method(), "POST");
        assert_eq!(request.headers()["x-api-key"], "abc");
        assert_eq!(request.headers()["x-forwarded-for"], "10.1.2.3");
    }

    #[test]
    fn test_build_request_rejects_malformed_header() {
        let headers = vec!["no-colon-here".to_string()];
        let err = build_request("Authorization", None, &headers, "http://localhost/", "GET")
            .unwrap_err();

        assert!(err.to_string().contains("no-colon-here"));
    }
}
