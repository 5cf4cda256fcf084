//! Rule Types
//!
//! Raw YAML document shape and the compiled form the engine runs against.
//! Selector dispatch is decided once at compile time (`field` vs
//! `field|contains`), not by string-splitting during every match.

use serde::Deserialize;

// ============================================================================
// RAW DOCUMENT SHAPE
// ============================================================================

/// One rule document as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detection: Option<RawDetection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDetection {
    #[serde(default)]
    pub selection: Option<serde_yaml::Mapping>,
}

// ============================================================================
// COMPILED FORM
// ============================================================================

/// Field dispatch for one selection entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Bare field name: text field must equal the value exactly
    Exact(String),
    /// `field|contains`: some element of a sequence field must contain the
    /// value as a case-sensitive substring
    ContainsInSequence(String),
}

/// The value side of a selection entry.
///
/// Feature fields are strings or string sequences, so only string values
/// can ever match; anything else compiles to `Unsupported` and fails its
/// entry (which also mirrors the upstream engine, where a non-string value
/// never equals a string field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchValue {
    Text(String),
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct SelectionEntry {
    pub selector: Selector,
    pub value: MatchValue,
}

/// A rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: String,
    pub title: Option<String>,
    /// `None` marks a malformed rule (missing `detection.selection`);
    /// it never matches but never aborts evaluation of the others.
    /// `Some(vec![])` is the permissive empty selection, which matches
    /// every record.
    pub entries: Option<Vec<SelectionEntry>>,
}

impl CompiledRule {
    /// Label reported on a match: declared title, falling back to the id.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Compile a raw document. Never fails: structural problems become a
    /// non-matching rule instead.
    pub fn compile(raw: RawRule) -> Self {
        let entries = raw
            .detection
            .and_then(|d| d.selection)
            .map(|selection| selection.into_iter().map(compile_entry).collect());

        CompiledRule {
            id: raw.id,
            title: raw.title,
            entries,
        }
    }
}

fn compile_entry((key, value): (serde_yaml::Value, serde_yaml::Value)) -> SelectionEntry {
    let key = match key {
        serde_yaml::Value::String(s) => s,
        other => {
            // Non-string selector key cannot name a field
            return SelectionEntry {
                selector: Selector::Exact(format!("{:?}", other)),
                value: MatchValue::Unsupported,
            };
        }
    };

    let selector = match key.split_once('|') {
        Some((field, "contains")) => Selector::ContainsInSequence(field.to_string()),
        // Unknown modifiers keep the full key as the field name, which can
        // never resolve - the entry fails, the rule does not match
        Some(_) => Selector::Exact(key),
        None => Selector::Exact(key),
    };

    let value = match value {
        serde_yaml::Value::String(s) => MatchValue::Text(s),
        _ => MatchValue::Unsupported,
    };

    SelectionEntry { selector, value }
}
