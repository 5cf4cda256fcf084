use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use super::aggregator::LogAggregator;
use super::record::{DetectionRecord, Detections};

fn record(session_id: i64, captured_at: chrono::DateTime<Utc>) -> DetectionRecord {
    DetectionRecord {
        session_id,
        origin_url: "https://origin.test/".to_string(),
        final_url: "https://final.test/".to_string(),
        redirect_route: Vec::new(),
        http_status: 200,
        response_headers: Default::default(),
        page_title: "t".to_string(),
        screenshot_ref: None,
        html: String::new(),
        user_agent: "test".to_string(),
        detections: Detections::default(),
        captured_at,
    }
}

#[tokio::test]
async fn append_creates_date_partition() {
    let dir = tempdir().unwrap();
    let agg = LogAggregator::new(dir.path(), "phishnet");
    let at = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();

    let path = agg.append(&record(1, at)).await.unwrap();
    assert_eq!(
        path,
        dir.path().join("202603").join("phishnet_2026-03-07.json")
    );

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: Vec<DetectionRecord> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].session_id, 1);
}

#[tokio::test]
async fn same_day_records_share_one_partition_in_append_order() {
    let dir = tempdir().unwrap();
    let agg = LogAggregator::new(dir.path(), "phishnet");
    let at = Utc.with_ymd_and_hms(2026, 3, 7, 8, 0, 0).unwrap();

    agg.append(&record(1, at)).await.unwrap();
    let path = agg
        .append(&record(2, at + chrono::Duration::hours(5)))
        .await
        .unwrap();

    let parsed: Vec<DetectionRecord> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let ids: Vec<i64> = parsed.iter().map(|r| r.session_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn different_days_land_in_different_partitions() {
    let dir = tempdir().unwrap();
    let agg = LogAggregator::new(dir.path(), "phishnet");

    let day1 = Utc.with_ymd_and_hms(2026, 3, 31, 23, 0, 0).unwrap();
    let day2 = Utc.with_ymd_and_hms(2026, 4, 1, 1, 0, 0).unwrap();

    let p1 = agg.append(&record(1, day1)).await.unwrap();
    let p2 = agg.append(&record(2, day2)).await.unwrap();

    assert_ne!(p1, p2);
    assert!(p1.ends_with("202603/phishnet_2026-03-31.json"));
    assert!(p2.ends_with("202604/phishnet_2026-04-01.json"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_partition_appends_lose_nothing() {
    let dir = tempdir().unwrap();
    let agg = Arc::new(LogAggregator::new(dir.path(), "phishnet"));
    let at = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();

    const N: i64 = 24;
    let mut handles = Vec::new();
    for session in 0..N {
        let agg = Arc::clone(&agg);
        handles.push(tokio::spawn(async move {
            agg.append(&record(session, at)).await.unwrap()
        }));
    }

    let mut path = None;
    for h in handles {
        path = Some(h.await.unwrap());
    }

    let parsed: Vec<DetectionRecord> =
        serde_json::from_str(&std::fs::read_to_string(path.unwrap()).unwrap()).unwrap();
    assert_eq!(parsed.len() as i64, N);

    // Exactly N distinct sessions, in some order
    let mut ids: Vec<i64> = parsed.iter().map(|r| r.session_id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len() as i64, N);
}

#[tokio::test]
async fn corrupted_partition_surfaces_persistence_error() {
    let dir = tempdir().unwrap();
    let agg = LogAggregator::new(dir.path(), "phishnet");
    let at = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();

    let target = dir.path().join("202603");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("phishnet_2026-03-07.json"), "not json").unwrap();

    let err = agg.append(&record(1, at)).await.unwrap_err();
    assert!(matches!(err, crate::error::Error::Persistence(_)));
}

#[test]
fn wire_schema_uses_camel_case_names() {
    let at = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
    let json = serde_json::to_value(record(5, at)).unwrap();

    assert!(json.get("sessionId").is_some());
    assert!(json.get("originUrl").is_some());
    assert!(json.get("finalUrl").is_some());
    assert!(json.get("redirectRoute").is_some());
    assert!(json.get("httpStatus").is_some());
    assert!(json.get("responseHeaders").is_some());
    assert!(json.get("pageTitle").is_some());
    assert!(json.get("screenshotRef").is_some());
    assert!(json.get("userAgent").is_some());
    assert!(json.get("capturedAt").is_some());

    let det = json.get("detections").unwrap();
    assert!(det.get("faviconHash").is_some());
    assert!(det.get("brandKeyword").is_some());
    assert!(det.get("iokMatch").is_some());
}
