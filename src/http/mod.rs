//! HTTP client module
//!
//! Provides the client that talks to the verification service.
//!
//! # Features
//!
//! - **Automatic Retries**: Transport failures retried with a flat delay
//! - **No Status Retries**: Non-2xx responses are final answers
//! - **Per-attempt Timeout**: Bounded by `request_timeout`

mod client;

pub use client::VerificationClient;
