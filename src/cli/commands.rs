//! CLI commands and argument parsing

use crate::config::AuthenticatorSettings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TypeAuth request authenticator CLI
#[derive(Parser, Debug)]
#[command(name = "typeauth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Application identifier
    #[arg(long, global = true)]
    pub app_id: Option<String>,

    /// Verification service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Header the token is read from
    #[arg(long, global = true)]
    pub token_header: Option<String>,

    /// Do not send request telemetry
    #[arg(long, global = true)]
    pub disable_telemetry: bool,

    /// Total attempts per verification
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given as flags; unset flags stay `None`
    pub fn settings(&self) -> AuthenticatorSettings {
        AuthenticatorSettings {
            app_id: self.app_id.clone(),
            base_url: self.base_url.clone(),
            token_header: self.token_header.clone(),
            disable_telemetry: self.disable_telemetry.then_some(true),
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
            ..Default::default()
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate a synthetic request carrying a token
    Verify {
        /// Token to verify (placed in the configured token header)
        #[arg(short, long)]
        token: Option<String>,

        /// Extra request header, "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request URL reported in telemetry
        #[arg(long, default_value = "http://localhost/")]
        url: String,

        /// Request method reported in telemetry
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
    },

    /// Start an HTTP server with an authenticated route
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}
