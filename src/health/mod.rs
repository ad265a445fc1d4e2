//! Credential health: client secret expiry self-check.

pub mod self_check;
