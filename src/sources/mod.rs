//! Token sources
//!
//! The OAuth2 refresh grant and the lifecycle manager built on top of it.

pub mod manager;
pub mod oauth2;
