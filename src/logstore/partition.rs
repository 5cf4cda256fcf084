//! Partition Naming
//!
//! A record's partition is a pure function of its capture timestamp, so
//! routing is deterministic: `logs/<YYYYMM>/<prefix>_<YYYY-MM-DD>.json`.
//! All records captured on one UTC day share one partition regardless of
//! session.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Day key, `YYYY-MM-DD`. The partition identity.
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Month key, `YYYYMM`. Coarser bucket used for the directory level.
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y%m").to_string()
}

/// Full partition path under `base_dir`.
pub fn partition_path(base_dir: &Path, prefix: &str, at: DateTime<Utc>) -> PathBuf {
    base_dir
        .join(month_key(at))
        .join(format!("{}_{}.json", prefix, day_key(at)))
}
