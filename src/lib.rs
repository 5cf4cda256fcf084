//! PhishNet Core - Phishing Telemetry Pipeline
//!
//! Turns low-level browsing events (redirects, navigation completions)
//! into persisted, detection-annotated session records. The host embeds
//! this crate, feeds it events, and gets back date-partitioned JSON logs
//! plus notifications for sessions that tripped a detector.
//!
//! ## Modules
//! - `features`: final-page HTML -> evaluable feature record
//! - `rules`: Sigma-style YAML rule engine (load, compile, evaluate)
//! - `brands`: brand reference data, favicon-hash and keyword correlation
//! - `session`: per-session redirect chain tracking with TTL eviction
//! - `logstore`: date-partitioned JSON record persistence
//! - `pipeline`: the coordinator wiring everything into the per-session flow

pub mod brands;
pub mod config;
pub mod constants;
pub mod error;
pub mod features;
pub mod logstore;
pub mod pipeline;
pub mod rules;
pub mod session;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use logstore::{DetectionRecord, Detections, LogAggregator};
pub use pipeline::{CompletionEvent, DetectionPipeline, RedirectEvent};
pub use session::{RedirectHop, SessionId, SessionTracker};
