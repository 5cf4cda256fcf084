//! Brand Reference Data
//!
//! Known-brand entries used for impersonation correlation: an exact favicon
//! hash match, or a case-insensitive keyword hit in the page text. Pure
//! lookups against read-only data - no scoring, no fuzziness.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// TYPES
// ============================================================================

/// One known brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEntry {
    pub brand: String,
    /// SHA-256 hex digest of the brand's favicon
    pub hash: String,
    pub keywords: Vec<String>,
}

/// A keyword hit: which brand, and which keyword tripped it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    pub brand: String,
    pub keyword: String,
}

// ============================================================================
// STORE
// ============================================================================

/// Process-wide brand set, same discipline as [`RuleStore`](crate::rules::RuleStore):
/// lazy cached load, failures retried, explicit install hook.
pub struct BrandStore {
    source: Option<PathBuf>,
    cache: RwLock<Option<Arc<Vec<BrandEntry>>>>,
}

impl BrandStore {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            cache: RwLock::new(None),
        }
    }

    pub fn empty() -> Self {
        Self {
            source: None,
            cache: RwLock::new(Some(Arc::new(Vec::new()))),
        }
    }

    /// Replace the cached brand set. Reload hook for tests.
    pub fn install(&self, brands: Vec<BrandEntry>) {
        *self.cache.write() = Some(Arc::new(brands));
    }

    pub fn load(&self) -> Result<Arc<Vec<BrandEntry>>> {
        if let Some(brands) = self.cache.read().as_ref() {
            return Ok(Arc::clone(brands));
        }

        let path = self
            .source
            .as_ref()
            .ok_or_else(|| Error::ConfigLoad("no brand source configured".into()))?;

        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("brand file {}: {}", path.display(), e)))?;
        let brands: Vec<BrandEntry> = serde_json::from_str(&text)
            .map_err(|e| Error::ConfigLoad(format!("brand file {}: {}", path.display(), e)))?;

        let brands = Arc::new(brands);
        *self.cache.write() = Some(Arc::clone(&brands));
        log::info!("Loaded {} brand entries from {}", brands.len(), path.display());
        Ok(brands)
    }
}

// ============================================================================
// CORRELATION
// ============================================================================

/// Brands whose favicon hash equals the given digest exactly.
pub fn match_favicon(hash: &str, brands: &[BrandEntry]) -> Vec<String> {
    brands
        .iter()
        .filter(|entry| entry.hash == hash)
        .map(|entry| entry.brand.clone())
        .collect()
}

/// Brands with a keyword appearing in the page text, case-insensitively.
/// At most one hit per brand - the first keyword that matches.
pub fn match_keywords(page_text: &str, brands: &[BrandEntry]) -> Vec<KeywordHit> {
    let lower = page_text.to_lowercase();
    let mut hits = Vec::new();

    for entry in brands {
        for keyword in &entry.keywords {
            if lower.contains(&keyword.to_lowercase()) {
                hits.push(KeywordHit {
                    brand: entry.brand.clone(),
                    keyword: keyword.clone(),
                });
                break;
            }
        }
    }

    hits
}

// ============================================================================
// TESTS
// ============================================================================
