//! Log Aggregator
//!
//! Read-modify-write append into date partitions. Concurrent appends to the
//! same partition are linearized behind a per-key async mutex so neither
//! writer's record is lost; different partitions proceed fully in parallel.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};

use super::partition::partition_path;
use super::record::DetectionRecord;

pub struct LogAggregator {
    base_dir: PathBuf,
    prefix: String,
    /// One lock per day key. Bounded growth: one entry per calendar day.
    partition_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl LogAggregator {
    pub fn new(base_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: prefix.into(),
            partition_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Append one record to its partition. Returns the partition path.
    ///
    /// The partition is read back in full, the record appended, and the
    /// whole array written out. An unreadable or unparseable existing
    /// partition surfaces as `Error::Persistence` - losing a detection
    /// record or clobbering a partition is a correctness failure, so
    /// nothing here is best-effort.
    pub async fn append(&self, record: &DetectionRecord) -> Result<PathBuf> {
        let path = partition_path(&self.base_dir, &self.prefix, record.captured_at);
        let lock = self.lock_for(record.captured_at);
        let _guard = lock.lock().await;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let mut records: Vec<DetectionRecord> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::Persistence(format!("partition {}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(Error::Persistence(format!(
                    "partition {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        records.push(record.clone());

        let bytes = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&path, bytes).await?;

        log::debug!(
            "Appended session {} record to {} ({} total)",
            record.session_id,
            path.display(),
            records.len()
        );
        Ok(path)
    }

    fn lock_for(&self, at: chrono::DateTime<chrono::Utc>) -> Arc<tokio::sync::Mutex<()>> {
        let key = super::partition::day_key(at);
        let mut locks = self.partition_locks.lock();
        Arc::clone(
            locks
                .entry(key)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}
