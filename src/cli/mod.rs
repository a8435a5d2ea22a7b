//! CLI module
//!
//! Command-line interface for the authenticator.
//!
//! # Commands
//!
//! - `verify` - Authenticate a token against the verification service
//! - `serve` - Start an HTTP server with a protected route

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve};
