// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # typeauth
//!
//! Authenticates incoming HTTP requests by handing their token to the
//! TypeAuth verification service. There is no local token validation and
//! no cache: every decision comes from the service.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use typeauth::{AuthResult, Authenticator, AuthenticatorConfig};
//!
//! let config = AuthenticatorConfig::builder("my-app-id").build()?;
//! let auth = Authenticator::new(config)?;
//!
//! match auth.authenticate(&request).await {
//!     AuthResult::Authenticated => { /* continue */ }
//!     AuthResult::Failed(err) => eprintln!("{} ({})", err.message, err.docs),
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │              Authenticator::authenticate(request)            │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────────┬─────────────┴────────┬───────────────────────┐
//! │ Extract token │ Build body           │ Dispatch              │
//! ├───────────────┼──────────────────────┼───────────────────────┤
//! │ Header lookup │ token + appID        │ POST /authenticate    │
//! │ Bearer strip  │ Telemetry (optional) │ Flat-delay retry      │
//! │               │                      │ Status = final answer │
//! └───────────────┴──────────────────────┴───────────────────────┘
//!                               │
//!               AuthResult::Authenticated | Failed
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Wire and result types
pub mod types;

/// Configuration, defaults and validation
pub mod config;

/// Token extraction and the authenticator
pub mod auth;

/// Verification client with retry
pub mod http;

/// axum middleware
pub mod middleware;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{Authenticator, IncomingRequest};
pub use config::{AuthenticatorConfig, AuthenticatorSettings};
pub use error::{Error, Result};
pub use types::{
    AuthError, AuthErrorKind, AuthResult, AUTHENTICATION_ERROR_DOCS, MISSING_TOKEN_DOCS,
};
