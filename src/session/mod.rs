//! Session Redirect Tracking
//!
//! Accumulates the ordered redirect chain and per-hop metadata for every
//! live browsing session, keyed by the short-lived session id the event
//! source supplies (a tab id in practice).
//!
//! ## Structure
//! - `types`: RedirectHop, SessionState, FinalizedChain
//! - `tracker`: the concurrent session arena

pub mod tracker;
pub mod types;


pub use tracker::SessionTracker;
pub use types::{FinalizedChain, RedirectHop, SessionId, SessionState};
