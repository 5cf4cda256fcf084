//! Log Aggregation
//!
//! Durable, date-partitioned store of detection records. Append-only at the
//! logical level: records are never reordered, updated, or removed once
//! written.
//!
//! ## Structure
//! - `record`: the persisted DetectionRecord schema
//! - `partition`: date keys and partition paths
//! - `aggregator`: read-modify-write append with per-partition locking

pub mod aggregator;
pub mod partition;
pub mod record;

#[cfg(test)]
mod tests;

pub use aggregator::LogAggregator;
pub use record::{DetectionRecord, Detections};
