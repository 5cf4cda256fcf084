//! Session Tracker
//!
//! Concurrent arena of per-session state. Hops for one session are visible
//! to finalize in recording order; sessions carry no ordering relationship
//! to each other. Lock scope is a map insert/remove - nothing here blocks
//! dispatch of unrelated sessions.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use parking_lot::RwLock;

use super::types::{FinalizedChain, RedirectHop, SessionId, SessionState};

pub struct SessionTracker {
    sessions: RwLock<HashMap<SessionId, SessionState>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Append one redirect to a session, creating its state on first call.
    ///
    /// Duplicate delivery of the same redirect event produces a duplicate
    /// hop. The upstream event source can re-deliver, and we mirror its
    /// semantics rather than guess at dedup keys - known limitation.
    pub fn record_redirect(&self, session_id: SessionId, redirect_url: String, hop: RedirectHop) {
        let mut sessions = self.sessions.write();
        let state = sessions.entry(session_id).or_insert_with(|| SessionState {
            redirect_urls: Vec::new(),
            hops: Vec::new(),
            last_seen: Utc::now(),
        });
        state.redirect_urls.push(redirect_url);
        state.hops.push(hop);
        state.last_seen = Utc::now();
    }

    /// Consume a session's chain. Single-use: the state is removed, and a
    /// later call for the same id behaves as if no chain was ever recorded
    /// (origin falls back to the terminal URL, empty hop list).
    pub fn finalize(&self, session_id: SessionId, final_url: &str) -> FinalizedChain {
        let state = self.sessions.write().remove(&session_id);

        match state {
            Some(state) => FinalizedChain {
                origin_url: state
                    .hops
                    .first()
                    .map(|h| h.url.clone())
                    .unwrap_or_else(|| final_url.to_string()),
                redirect_urls: state.redirect_urls,
                hops: state.hops,
            },
            None => FinalizedChain {
                origin_url: final_url.to_string(),
                redirect_urls: Vec::new(),
                hops: Vec::new(),
            },
        }
    }

    /// Drop sessions idle longer than `ttl_secs`. A session that never
    /// completes must not pin memory forever. Returns the eviction count.
    pub fn evict_stale(&self, ttl_secs: i64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(ttl_secs);
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, state| state.last_seen >= cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} stale session(s)", evicted);
        }
        evicted
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}
