//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a default path or interval, only edit this file.

/// Prefix for partition file names (`<prefix>_<YYYY-MM-DD>.json`)
pub const DEFAULT_LOG_PREFIX: &str = "phishnet";

/// Directory name for the partition tree, under the data dir
pub const LOG_DIR_NAME: &str = "logs";

/// User agent sent with final-page and favicon fetches,
/// and recorded in the persisted log entry
pub const DEFAULT_USER_AGENT: &str = "PhishNet/0.1 (telemetry collector)";

/// Timeout for final-page / favicon fetches (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Sessions idle longer than this are evicted (seconds).
/// A session that never receives a completion event must not
/// accumulate forever.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 60;

/// How often the eviction task scans for stale sessions (seconds)
pub const DEFAULT_EVICTION_INTERVAL_SECS: u64 = 60;

/// HTTP status range counted as a successful navigation
pub const SUCCESS_STATUS: std::ops::RangeInclusive<u16> = 200..=299;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PhishNet";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get log prefix from environment or use default
pub fn get_log_prefix() -> String {
    std::env::var("PHISHNET_LOG_PREFIX").unwrap_or_else(|_| DEFAULT_LOG_PREFIX.to_string())
}

/// Get fetch user agent from environment or use default
pub fn get_user_agent() -> String {
    std::env::var("PHISHNET_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string())
}

/// Get fetch timeout from environment or use default
pub fn get_fetch_timeout_secs() -> u64 {
    std::env::var("PHISHNET_FETCH_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
}

/// Get session TTL from environment or use default
pub fn get_session_ttl_secs() -> i64 {
    std::env::var("PHISHNET_SESSION_TTL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_SECS)
}
