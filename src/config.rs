//! Pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// Configuration for one [`DetectionPipeline`](crate::pipeline::DetectionPipeline).
///
/// Rule and brand paths are optional: a pipeline without them still tracks
/// sessions and persists records, with the corresponding detection lists
/// left empty.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory of YAML rule documents, loaded in filename order
    pub rules_dir: Option<PathBuf>,
    /// JSON array of brand reference entries
    pub brands_path: Option<PathBuf>,
    /// Root of the partition tree (`<log_dir>/<YYYYMM>/...`)
    pub log_dir: PathBuf,
    /// Partition file prefix
    pub log_prefix: String,
    /// User agent for page/favicon fetches, also recorded per entry
    pub user_agent: String,
    /// Timeout applied to each content fetch
    pub fetch_timeout: Duration,
    /// Sessions idle longer than this are dropped
    pub session_ttl_secs: i64,
    /// Scan interval of the background eviction task
    pub eviction_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let log_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phishnet")
            .join(constants::LOG_DIR_NAME);

        Self {
            rules_dir: None,
            brands_path: None,
            log_dir,
            log_prefix: constants::get_log_prefix(),
            user_agent: constants::get_user_agent(),
            fetch_timeout: Duration::from_secs(constants::get_fetch_timeout_secs()),
            session_ttl_secs: constants::get_session_ttl_secs(),
            eviction_interval: Duration::from_secs(constants::DEFAULT_EVICTION_INTERVAL_SECS),
        }
    }
}
