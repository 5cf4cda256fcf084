//! Rule Evaluation
//!
//! Pure match loop: no I/O, no caching, no partial-match scoring. A rule is
//! boolean matched/not-matched.

use crate::features::{FeatureRecord, FieldRef};

use super::types::{CompiledRule, MatchValue, SelectionEntry, Selector};

/// Evaluate every rule against one feature record.
///
/// Returns matched rule labels in declaration order; duplicates are not
/// collapsed. A rule matches only if every selection entry matches
/// (implicit AND); evaluation of a rule short-circuits on its first
/// failing entry. An empty selection matches unconditionally - upstream
/// behavior, preserved as-is.
pub fn evaluate(features: &FeatureRecord, rules: &[CompiledRule]) -> Vec<String> {
    let mut matches = Vec::new();

    for rule in rules {
        let Some(entries) = &rule.entries else {
            // Malformed rule: never matches, never aborts the rest
            continue;
        };

        if entries.iter().all(|entry| entry_matches(features, entry)) {
            matches.push(rule.label().to_string());
        }
    }

    matches
}

fn entry_matches(features: &FeatureRecord, entry: &SelectionEntry) -> bool {
    let MatchValue::Text(expected) = &entry.value else {
        return false;
    };

    match &entry.selector {
        Selector::Exact(field) => match features.field(field) {
            Some(FieldRef::Text(actual)) => actual == expected,
            // Sequence field against a plain selector is a type mismatch
            Some(FieldRef::List(_)) | None => false,
        },
        Selector::ContainsInSequence(field) => match features.field(field) {
            Some(FieldRef::List(items)) => items.iter().any(|item| item.contains(expected)),
            // Missing field or not a sequence: the entry fails
            Some(FieldRef::Text(_)) | None => false,
        },
    }
}
