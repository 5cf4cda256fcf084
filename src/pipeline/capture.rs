//! Screenshot capture seam
//!
//! Capture is environment-specific (a browser host, a headless driver) and
//! optional. The pipeline only needs an opaque reference to store in the
//! session record, so the seam returns `Option<String>` and never fails
//! the session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::session::SessionId;

/// Produces a stored-screenshot reference for a finished session, or
/// `None` when capture is unavailable.
#[async_trait]
pub trait ScreenshotCapture: Send + Sync {
    async fn capture(&self, session_id: SessionId, final_url: &str) -> Option<String>;
}

/// Default capture backend for headless deployments: never captures.
pub struct NoCapture;

#[async_trait]
impl ScreenshotCapture for NoCapture {
    async fn capture(&self, _session_id: SessionId, _final_url: &str) -> Option<String> {
        None
    }
}

/// Reference naming convention shared by capture backends:
/// `screenshots/<unix-ts>_session<id>.png`.
pub fn screenshot_ref(session_id: SessionId, at: DateTime<Utc>) -> String {
    format!("screenshots/{}_session{}.png", at.timestamp(), session_id)
}
