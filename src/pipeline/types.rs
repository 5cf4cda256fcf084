//! Pipeline event and notification types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// One observed redirect, as delivered by the event source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectEvent {
    pub session_id: SessionId,
    /// URL the navigation redirected away from
    pub source_url: String,
    /// URL the navigation redirected to
    pub redirect_url: String,
    pub status_code: u16,
    #[serde(default)]
    pub response_headers: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

/// Navigation completion, successful or not. The coordinator decides
/// whether it is worth analyzing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub session_id: SessionId,
    pub final_url: String,
    pub status_code: u16,
    #[serde(default)]
    pub response_headers: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

/// User-facing alert emitted when a completed session produced detections.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title_text: String,
    pub body_text: String,
    /// 2 for rule matches, 1 for brand correlations
    pub priority: u8,
}
