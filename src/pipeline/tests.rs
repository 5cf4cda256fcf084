use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tempfile::tempdir;

use crate::brands::BrandEntry;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::logstore::DetectionRecord;
use crate::rules::loader::parse_documents;

use super::capture::ScreenshotCapture;
use super::coordinator::{hash_favicon, DetectionPipeline};
use super::fetch::ContentFetcher;
use super::notify::Notifier;
use super::types::{CompletionEvent, Notification, RedirectEvent};

// ============================================
// Fakes
// ============================================

#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
    blobs: HashMap<String, Vec<u8>>,
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::ContentFetch(format!("no canned page for {}", url)))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.blobs
            .get(url)
            .cloned()
            .ok_or_else(|| Error::ContentFetch(format!("no canned blob for {}", url)))
    }
}

struct FixedCapture(&'static str);

#[async_trait]
impl ScreenshotCapture for FixedCapture {
    async fn capture(&self, _session_id: i64, _final_url: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.sent.lock().push(notification.clone());
    }
}

// ============================================
// Fixtures
// ============================================

const PHISH_PAGE: &str = r#"<html><head>
    <title>Verify your account</title>
    <link rel="icon" href="/favicon.ico">
  </head>
  <body><p>Welcome to PayPal, please sign in.</p></body>
</html>"#;

const CLEAN_PAGE: &str = r#"<html><head><title>Weather</title></head>
  <body><p>Sunny, 21 degrees.</p></body></html>"#;

const FAVICON_BYTES: &[u8] = b"\x00\x01\x02brandicon";

const IOK_RULE: &str = r#"
id: iok-title-verify
title: Credential-prompt title
detection:
  selection:
    title|contains: "Verify"
"#;

fn at(secs: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, secs).unwrap()
}

fn redirect(session_id: i64, source: &str, target: &str, secs: u32) -> RedirectEvent {
    RedirectEvent {
        session_id,
        source_url: source.to_string(),
        redirect_url: target.to_string(),
        status_code: 302,
        response_headers: HashMap::from([("location".to_string(), target.to_string())]),
        timestamp: at(secs),
    }
}

fn completion(session_id: i64, final_url: &str, status: u16) -> CompletionEvent {
    CompletionEvent {
        session_id,
        final_url: final_url.to_string(),
        status_code: status,
        response_headers: HashMap::from([("server".to_string(), "nginx".to_string())]),
        timestamp: at(30),
    }
}

fn pipeline_with(
    log_dir: &std::path::Path,
    fetcher: FakeFetcher,
    notifier: Arc<RecordingNotifier>,
) -> DetectionPipeline {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = PipelineConfig {
        log_dir: log_dir.to_path_buf(),
        ..PipelineConfig::default()
    };
    let pipeline = DetectionPipeline::with_collaborators(
        config,
        Arc::new(fetcher),
        Arc::new(FixedCapture("screenshots/test.png")),
        notifier,
    );
    pipeline.rules().install(parse_documents(&[IOK_RULE]));
    pipeline.brands().install(vec![BrandEntry {
        brand: "PayPal".to_string(),
        hash: hash_favicon(FAVICON_BYTES),
        keywords: vec!["paypal".to_string()],
    }]);
    pipeline
}

fn read_partition(log_dir: &std::path::Path) -> Vec<DetectionRecord> {
    let path = log_dir.join("202603").join("phishnet_2026-03-07.json");
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================
// Tests
// ============================================

#[tokio::test]
async fn successful_completion_produces_full_record() {
    let dir = tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let fetcher = FakeFetcher {
        pages: HashMap::from([("https://r3.test/landing".to_string(), PHISH_PAGE.to_string())]),
        blobs: HashMap::from([(
            "https://r3.test/favicon.ico".to_string(),
            FAVICON_BYTES.to_vec(),
        )]),
    };
    let pipeline = pipeline_with(dir.path(), fetcher, Arc::clone(&notifier));

    pipeline.on_redirect(redirect(7, "https://r1.test/", "https://r2.test/", 1));
    pipeline.on_redirect(redirect(7, "https://r2.test/", "https://r3.test/landing", 2));

    let record = pipeline
        .on_completed(completion(7, "https://r3.test/landing", 200))
        .await
        .unwrap()
        .expect("successful completion yields a record");

    assert_eq!(record.session_id, 7);
    assert_eq!(record.origin_url, "https://r1.test/");
    assert_eq!(record.final_url, "https://r3.test/landing");
    assert_eq!(record.redirect_route.len(), 2);
    assert_eq!(record.redirect_route[0].url, "https://r1.test/");
    assert_eq!(record.page_title, "Verify your account");
    assert_eq!(record.screenshot_ref.as_deref(), Some("screenshots/test.png"));

    assert_eq!(
        record.detections.iok_match,
        vec!["Credential-prompt title".to_string()]
    );
    assert_eq!(record.detections.favicon_hash, vec!["PayPal".to_string()]);
    assert_eq!(record.detections.brand_keyword, vec!["PayPal".to_string()]);

    // Session is consumed
    assert_eq!(pipeline.tracker().live_sessions(), 0);

    // Record reached the partition
    let persisted = read_partition(dir.path());
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].origin_url, record.origin_url);

    // One alert per detection family, rule matches at higher priority
    let sent = notifier.sent.lock();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].priority, 2);
    assert!(sent[0].body_text.contains("Credential-prompt title"));
    assert_eq!(sent[1].priority, 1);
    assert_eq!(sent[2].priority, 1);
}

#[tokio::test]
async fn failed_navigation_is_skipped_and_session_survives() {
    let dir = tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = pipeline_with(dir.path(), FakeFetcher::default(), Arc::clone(&notifier));

    pipeline.on_redirect(redirect(3, "https://a.test/", "https://b.test/", 1));

    let outcome = pipeline
        .on_completed(completion(3, "https://b.test/", 404))
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert_eq!(pipeline.tracker().live_sessions(), 1);
    assert!(notifier.sent.lock().is_empty());
    assert!(!dir.path().join("202603").exists());
}

#[tokio::test]
async fn page_fetch_failure_degrades_but_still_persists() {
    let dir = tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    // Fetcher knows nothing: page and favicon fetches both fail
    let pipeline = pipeline_with(dir.path(), FakeFetcher::default(), Arc::clone(&notifier));

    pipeline.on_redirect(redirect(9, "https://a.test/", "https://b.test/", 1));

    let record = pipeline
        .on_completed(completion(9, "https://b.test/", 200))
        .await
        .unwrap()
        .expect("degraded record is still emitted");

    assert_eq!(record.origin_url, "https://a.test/");
    assert!(record.html.is_empty());
    assert!(record.detections.is_empty());
    assert!(notifier.sent.lock().is_empty());

    let persisted = read_partition(dir.path());
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].session_id, 9);
}

#[tokio::test]
async fn clean_page_emits_no_notifications() {
    let dir = tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let fetcher = FakeFetcher {
        pages: HashMap::from([("https://ok.test/".to_string(), CLEAN_PAGE.to_string())]),
        blobs: HashMap::new(),
    };
    let pipeline = pipeline_with(dir.path(), fetcher, Arc::clone(&notifier));

    let record = pipeline
        .on_completed(completion(11, "https://ok.test/", 200))
        .await
        .unwrap()
        .expect("clean sessions are still recorded");

    // No redirects: origin falls back to the final URL
    assert_eq!(record.origin_url, "https://ok.test/");
    assert!(record.redirect_route.is_empty());
    assert!(record.detections.is_empty());
    assert!(notifier.sent.lock().is_empty());
}

#[tokio::test]
async fn keyword_match_is_case_insensitive_without_favicon() {
    let dir = tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let page = r#"<html><head><title>Login</title></head>
      <body><p>welcome to PAYPAL</p></body></html>"#;
    let fetcher = FakeFetcher {
        pages: HashMap::from([("https://kw.test/".to_string(), page.to_string())]),
        blobs: HashMap::new(),
    };
    let pipeline = pipeline_with(dir.path(), fetcher, Arc::clone(&notifier));

    let record = pipeline
        .on_completed(completion(4, "https://kw.test/", 200))
        .await
        .unwrap()
        .unwrap();

    assert!(record.detections.favicon_hash.is_empty());
    assert_eq!(record.detections.brand_keyword, vec!["PayPal".to_string()]);

    let sent = notifier.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].priority, 1);
    assert!(sent[0].title_text.contains("keywords"));
}
