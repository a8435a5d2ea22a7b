//! Authentication module
//!
//! The `Authenticator` extracts a token from an incoming request and asks
//! the verification service whether it is valid. Nothing is cached and no
//! token is inspected locally.

mod authenticator;
mod request;
mod telemetry;
mod token;

pub use authenticator::Authenticator;
pub use request::IncomingRequest;
pub use token::{extract_token, BEARER_PREFIX};
