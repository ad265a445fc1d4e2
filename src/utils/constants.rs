//! Shared constants and invariants

/// Access tokens are treated as expired this many seconds before `expires_at`.
pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WARNING_THRESHOLD_DAYS: i64 = 30;

pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";

/// Unfilled expiry date shipped in sample configs; disables the self-check.
pub const EXPIRE_DATE_PLACEHOLDER: &str = "202X-XX-XX";
pub const EXPIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Owner read/write only, used for every file holding a secret.
pub const SECRET_FILE_MODE: u32 = 0o600;
