//! Feature Extraction
//!
//! Turns a final URL plus raw HTML into the normalized, rule-evaluable
//! representation of a page. Thin by design - the heavy lifting lives in
//! the rule engine and the coordinator.

pub mod extract;
pub mod record;

pub use extract::{extract, ExtractedPage};
pub use record::{FeatureRecord, FieldRef};
