//! # Mail Agent Library
//!
//! Sends mail through a cloud mail API using OAuth2 delegated credentials.
//! Access tokens are cached on disk between invocations, refresh tokens are
//! rotated safely, and a self-check warns the administrator before the
//! application client secret expires.
//!
//! Modules:
//! - `config` — configuration document, loading and validation
//! - `cache` — access token cache and refresh token stores
//! - `sources` — OAuth2 refresh grant and the token lifecycle manager
//! - `sinks` — mail API sender
//! - `parser` — mail templates
//! - `health` — client secret expiry self-check and OAuth health check

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod health;
pub mod helpers;
pub mod parser;
pub mod sinks;
pub mod sources;
pub mod tests;
pub mod utils;


pub use crate::config::settings::ServiceConfig;
pub use crate::error::{MailError, TokenError};
pub use crate::sources::manager::TokenManager;
