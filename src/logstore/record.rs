//! Detection Record
//!
//! The forensic log entry persisted per completed session. Field names are
//! wire format - downstream tooling parses these partitions, so the
//! camelCase names are load-bearing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{RedirectHop, SessionId};

/// Per-category detection results. Empty lists mean the analysis path ran
/// (or was skipped after a degraded fetch) and found nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detections {
    /// Brands whose favicon hash matched exactly
    pub favicon_hash: Vec<String>,
    /// Brands with a keyword hit in the page text
    pub brand_keyword: Vec<String>,
    /// Matched rule labels, in declaration order
    pub iok_match: Vec<String>,
}

impl Detections {
    pub fn is_empty(&self) -> bool {
        self.favicon_hash.is_empty() && self.brand_keyword.is_empty() && self.iok_match.is_empty()
    }
}

/// One completed session's forensic record. Created once, immutable,
/// appended to the partition for its `captured_at` date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    pub session_id: SessionId,
    pub origin_url: String,
    pub final_url: String,
    pub redirect_route: Vec<RedirectHop>,
    pub http_status: u16,
    pub response_headers: HashMap<String, String>,
    pub page_title: String,
    /// Reference/path to the capture, not raw bytes; absent when capture
    /// failed or was disabled
    pub screenshot_ref: Option<String>,
    pub html: String,
    pub user_agent: String,
    pub detections: Detections,
    pub captured_at: DateTime<Utc>,
}
