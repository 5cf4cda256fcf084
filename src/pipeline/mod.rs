//! Detection Pipeline
//!
//! The coordinator wires the other modules into the per-session flow:
//! redirect events accumulate in the tracker, a successful completion
//! triggers page capture, feature extraction, rule evaluation and brand
//! correlation, and the assembled record lands in the date-partitioned
//! log store.
//!
//! ## Structure
//! - `types`: redirect/completion events, notifications
//! - `fetch`: `ContentFetcher` seam + reqwest-backed `HttpFetcher`
//! - `capture`: `ScreenshotCapture` seam (optional, never fatal)
//! - `notify`: `Notifier` seam + log-backed default
//! - `coordinator`: `DetectionPipeline` - the flow itself

pub mod capture;
pub mod coordinator;
pub mod fetch;
pub mod notify;
pub mod types;

#[cfg(test)]
mod tests;

pub use capture::{NoCapture, ScreenshotCapture};
pub use coordinator::{hash_favicon, DetectionPipeline};
pub use fetch::{ContentFetcher, HttpFetcher};
pub use notify::{LogNotifier, Notifier};
pub use types::{CompletionEvent, Notification, RedirectEvent};
