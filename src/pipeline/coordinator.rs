//! Detection Coordinator
//!
//! Owns the full per-session flow: accumulate redirects, gate on the
//! completion status, pull the final page, run rule and brand
//! correlation, emit notifications, persist the record.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::brands::{self, BrandStore};
use crate::config::PipelineConfig;
use crate::constants;
use crate::error::Result;
use crate::features::{self, ExtractedPage};
use crate::logstore::{DetectionRecord, Detections, LogAggregator};
use crate::rules::{self, RuleStore};
use crate::session::{RedirectHop, SessionTracker};

use super::capture::{NoCapture, ScreenshotCapture};
use super::fetch::{ContentFetcher, HttpFetcher};
use super::notify::{LogNotifier, Notifier};
use super::types::{CompletionEvent, Notification, RedirectEvent};

pub struct DetectionPipeline {
    config: PipelineConfig,
    tracker: SessionTracker,
    aggregator: LogAggregator,
    rules: RuleStore,
    brands: BrandStore,
    fetcher: Arc<dyn ContentFetcher>,
    capture: Arc<dyn ScreenshotCapture>,
    notifier: Arc<dyn Notifier>,
}

impl DetectionPipeline {
    /// Build a pipeline with production collaborators (HTTP fetcher,
    /// no screenshot capture, log-backed notifier).
    pub fn new(config: PipelineConfig) -> Self {
        let fetcher = Arc::new(HttpFetcher::new(&config.user_agent, config.fetch_timeout));
        Self::with_collaborators(config, fetcher, Arc::new(NoCapture), Arc::new(LogNotifier))
    }

    /// Build a pipeline with explicit collaborators. This is the seam
    /// tests use to substitute canned pages and recording sinks.
    pub fn with_collaborators(
        config: PipelineConfig,
        fetcher: Arc<dyn ContentFetcher>,
        capture: Arc<dyn ScreenshotCapture>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let rules = match &config.rules_dir {
            Some(dir) => RuleStore::from_dir(dir),
            None => RuleStore::empty(),
        };
        let brands = match &config.brands_path {
            Some(path) => BrandStore::from_path(path),
            None => BrandStore::empty(),
        };
        let aggregator = LogAggregator::new(&config.log_dir, &config.log_prefix);

        Self {
            config,
            tracker: SessionTracker::new(),
            aggregator,
            rules,
            brands,
            fetcher,
            capture,
            notifier,
        }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn brands(&self) -> &BrandStore {
        &self.brands
    }

    // ============================================
    // Event entry points
    // ============================================

    /// Record one redirect hop. Cheap and synchronous; no IO.
    pub fn on_redirect(&self, event: RedirectEvent) {
        let hop = RedirectHop {
            url: event.source_url,
            timestamp: event.timestamp,
            status_code: event.status_code,
            headers: event.response_headers,
        };
        self.tracker
            .record_redirect(event.session_id, event.redirect_url, hop);
    }

    /// Handle a navigation completion.
    ///
    /// Non-2xx completions are ignored: the session stays in the tracker
    /// (a later successful completion may still arrive) and nothing is
    /// persisted. For successful completions the full analysis runs and
    /// the resulting record is returned after it has been written.
    pub async fn on_completed(&self, event: CompletionEvent) -> Result<Option<DetectionRecord>> {
        if !constants::SUCCESS_STATUS.contains(&event.status_code) {
            log::debug!(
                "session {} completed with status {}, skipping analysis",
                event.session_id,
                event.status_code
            );
            return Ok(None);
        }

        let chain = self.tracker.finalize(event.session_id, &event.final_url);
        log::info!(
            "analyzing session {} ({} -> {}, {} hops)",
            event.session_id,
            chain.origin_url,
            event.final_url,
            chain.hops.len()
        );

        let screenshot_ref = self
            .capture
            .capture(event.session_id, &event.final_url)
            .await;

        // A fetch failure degrades the record, it does not drop it:
        // the chain itself is already evidence worth keeping.
        let html = match self.fetcher.fetch_text(&event.final_url).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("session {}: page fetch failed: {}", event.session_id, e);
                String::new()
            }
        };

        let page = features::extract(&event.final_url, &html, chain.redirect_urls.clone());

        let detections = Detections {
            iok_match: self.evaluate_rules(&page),
            favicon_hash: self.correlate_favicon(&page).await,
            brand_keyword: self.correlate_keywords(&page),
        };
        self.emit_notifications(&detections);

        let record = DetectionRecord {
            session_id: event.session_id,
            origin_url: chain.origin_url,
            final_url: event.final_url,
            redirect_route: chain.hops,
            http_status: event.status_code,
            response_headers: event.response_headers,
            page_title: page.features.title.first().cloned().unwrap_or_default(),
            screenshot_ref,
            html,
            user_agent: self.config.user_agent.clone(),
            detections,
            captured_at: event.timestamp,
        };

        let path = self.aggregator.append(&record).await?;
        log::info!(
            "session {} recorded to {} ({} detections)",
            record.session_id,
            path.display(),
            record.detections.iok_match.len()
                + record.detections.favicon_hash.len()
                + record.detections.brand_keyword.len()
        );
        Ok(Some(record))
    }

    /// Spawn the background eviction loop. Runs until the pipeline is
    /// dropped and the handle is aborted.
    pub fn start_eviction_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(pipeline.config.eviction_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                pipeline.tracker.evict_stale(pipeline.config.session_ttl_secs);
            }
        })
    }

    // ============================================
    // Correlation steps
    // ============================================

    fn evaluate_rules(&self, page: &ExtractedPage) -> Vec<String> {
        match self.rules.load() {
            Ok(ruleset) => rules::evaluate(&page.features, &ruleset),
            Err(e) => {
                // Load failures are not cached, so the next session
                // retries with whatever is on disk then.
                log::error!("rule load failed, skipping rule evaluation: {}", e);
                Vec::new()
            }
        }
    }

    async fn correlate_favicon(&self, page: &ExtractedPage) -> Vec<String> {
        let Some(favicon_url) = &page.favicon_url else {
            return Vec::new();
        };
        let brands = match self.brands.load() {
            Ok(b) => b,
            Err(e) => {
                log::error!("brand load failed, skipping favicon correlation: {}", e);
                return Vec::new();
            }
        };
        if brands.is_empty() {
            return Vec::new();
        }

        let bytes = match self.fetcher.fetch_bytes(favicon_url).await {
            Ok(b) => b,
            Err(e) => {
                log::warn!("favicon fetch failed ({}): {}", favicon_url, e);
                return Vec::new();
            }
        };

        let hash = hash_favicon(&bytes);
        brands::match_favicon(&hash, &brands)
    }

    fn correlate_keywords(&self, page: &ExtractedPage) -> Vec<String> {
        let brands = match self.brands.load() {
            Ok(b) => b,
            Err(e) => {
                log::error!("brand load failed, skipping keyword correlation: {}", e);
                return Vec::new();
            }
        };
        brands::match_keywords(&page.page_text, &brands)
            .into_iter()
            .map(|hit| hit.brand)
            .collect()
    }

    fn emit_notifications(&self, detections: &Detections) {
        if !detections.iok_match.is_empty() {
            self.notifier.notify(&Notification {
                title_text: "Suspicious page detected".to_string(),
                body_text: format!("Matched rules: {}", detections.iok_match.join(", ")),
                priority: 2,
            });
        }
        if !detections.favicon_hash.is_empty() {
            self.notifier.notify(&Notification {
                title_text: "Brand favicon detected".to_string(),
                body_text: format!(
                    "Page favicon matches: {}",
                    detections.favicon_hash.join(", ")
                ),
                priority: 1,
            });
        }
        if !detections.brand_keyword.is_empty() {
            self.notifier.notify(&Notification {
                title_text: "Brand keywords detected".to_string(),
                body_text: format!(
                    "Page text mentions: {}",
                    detections.brand_keyword.join(", ")
                ),
                priority: 1,
            });
        }
    }
}

/// Lowercase hex SHA-256 of the favicon bytes, the form brand reference
/// entries carry.
pub fn hash_favicon(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
