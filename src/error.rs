//! Error handling

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error taxonomy.
///
/// `ConfigLoad` and `Persistence` are surfaced to callers; `ContentFetch`
/// is normally recovered inside the coordinator (the session record is
/// still emitted with whatever could be populated).
#[derive(Debug, Error)]
pub enum Error {
    /// Rule or brand reference data failed to load. Not cached as a
    /// permanent failure - the next evaluation attempt retries the load.
    #[error("config load failed: {0}")]
    ConfigLoad(String),

    /// Final-page or favicon content could not be fetched.
    #[error("content fetch failed: {0}")]
    ContentFetch(String),

    /// Partition read/write failed. Losing a detection record is a
    /// correctness failure, so this is never swallowed.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Caller handed us something unusable (bad URL, empty path).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}
