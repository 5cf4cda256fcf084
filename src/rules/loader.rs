//! Rule Loading & Caching
//!
//! Rules are read from a directory of YAML documents once on first need and
//! cached for the process lifetime. A failed load is returned to the caller
//! and NOT cached - the next evaluation attempt retries. `install` is the
//! explicit reload hook for tests and embedded rule sets.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};

use super::types::{CompiledRule, RawRule};

/// Process-wide rule set: explicit one-time source configuration,
/// lazy cached load.
pub struct RuleStore {
    source: Option<PathBuf>,
    cache: RwLock<Option<Arc<Vec<CompiledRule>>>>,
}

impl RuleStore {
    /// Store backed by a directory of `.yml`/`.yaml` documents.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(dir.into()),
            cache: RwLock::new(None),
        }
    }

    /// Store with no source; `load` yields an empty rule set until
    /// `install` is called.
    pub fn empty() -> Self {
        Self {
            source: None,
            cache: RwLock::new(Some(Arc::new(Vec::new()))),
        }
    }

    /// Replace the cached rule set. Reload hook for tests.
    pub fn install(&self, rules: Vec<CompiledRule>) {
        *self.cache.write() = Some(Arc::new(rules));
    }

    /// Get the rule set, loading from the configured source on first need.
    ///
    /// Rules are invariant for the lifetime of the returned `Arc`, so one
    /// session's evaluation never observes a mid-flight reload.
    pub fn load(&self) -> Result<Arc<Vec<CompiledRule>>> {
        if let Some(rules) = self.cache.read().as_ref() {
            return Ok(Arc::clone(rules));
        }

        let dir = self
            .source
            .as_ref()
            .ok_or_else(|| Error::ConfigLoad("no rule source configured".into()))?;

        let loaded = Arc::new(load_dir(dir)?);
        *self.cache.write() = Some(Arc::clone(&loaded));
        log::info!("Loaded {} detection rules from {}", loaded.len(), dir.display());
        Ok(loaded)
    }
}

/// Load every rule document in a directory, in filename order.
///
/// Declaration order = sorted filename order, so match output is
/// deterministic across runs. An unreadable directory is a load failure;
/// an unparseable file degrades to a non-matching placeholder rule.
pub fn load_dir(dir: &Path) -> Result<Vec<CompiledRule>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::ConfigLoad(format!("rule dir {}: {}", dir.display(), e)))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yml") | Some("yaml")
            )
        })
        .collect();
    paths.sort();

    let mut rules = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::ConfigLoad(format!("rule file {}: {}", path.display(), e)))?;
        rules.push(parse_document(&path, &text));
    }

    Ok(rules)
}

fn parse_document(path: &Path, text: &str) -> CompiledRule {
    match serde_yaml::from_str::<RawRule>(text) {
        Ok(raw) => CompiledRule::compile(raw),
        Err(e) => {
            log::warn!("Failed to parse rule {}: {}", path.display(), e);
            // Keep the slot so operators can see the broken rule by name
            CompiledRule {
                id: path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unparseable")
                    .to_string(),
                title: None,
                entries: None,
            }
        }
    }
}

/// Parse a set of in-memory YAML documents, in the order given.
/// Used by embedded rule sets and tests.
pub fn parse_documents(docs: &[&str]) -> Vec<CompiledRule> {
    docs.iter()
        .map(|text| match serde_yaml::from_str::<RawRule>(text) {
            Ok(raw) => CompiledRule::compile(raw),
            Err(e) => {
                log::warn!("Failed to parse inline rule: {}", e);
                CompiledRule {
                    id: "unparseable".to_string(),
                    title: None,
                    entries: None,
                }
            }
        })
        .collect()
}
