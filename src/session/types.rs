//! Session Types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short-lived session identifier supplied by the event source
/// (the browser tab id in the reference deployment).
pub type SessionId = i64;

/// One intercepted redirect step. Created exactly once per redirect event;
/// appended, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RedirectHop {
    /// URL the hop redirected away from
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub status_code: u16,
    pub headers: HashMap<String, String>,
}

/// Mutable per-session accumulation state. Owned exclusively by the
/// tracker; destroyed on finalize or eviction.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Redirect targets, in hop order
    pub redirect_urls: Vec<String>,
    /// Strictly ordered by observation time
    pub hops: Vec<RedirectHop>,
    pub last_seen: DateTime<Utc>,
}

/// What finalize hands to the coordinator.
#[derive(Debug, Clone)]
pub struct FinalizedChain {
    /// First hop's source URL, or the terminal URL for single-hop sessions
    pub origin_url: String,
    /// Redirect targets, in hop order
    pub redirect_urls: Vec<String>,
    pub hops: Vec<RedirectHop>,
}
