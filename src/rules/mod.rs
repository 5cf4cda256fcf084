//! Rule Engine
//!
//! Sigma-style detection rules evaluated against page feature records.
//! A rule's `detection.selection` is a flat field-to-value mapping with
//! implicit AND across entries - no nested boolean logic, no chaining.
//!
//! ## Structure
//! - `types`: raw YAML shape, compiled rules, selector dispatch
//! - `loader`: `RuleStore` (configured source, lazy cached load, reload hook)
//! - `engine`: `evaluate` - the match loop

pub mod engine;
pub mod loader;
pub mod types;


pub use engine::evaluate;
pub use loader::RuleStore;
pub use types::{CompiledRule, MatchValue, Selector, SelectionEntry};
