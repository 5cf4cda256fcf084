//! Page Feature Record
//!
//! Fixed schema for everything the rule engine can look at. Built once per
//! completed session and immutable afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Normalized page features for one completed session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Page titles (the collector always supplies a single-element list)
    pub title: Vec<String>,
    pub hostname: String,
    /// Serialized DOM of the document element
    pub dom_snapshot: String,
    /// Raw HTML as fetched
    pub html_snapshot: String,
    /// Inline script bodies
    pub scripts: Vec<String>,
    /// hrefs of `link[rel=stylesheet]`
    pub stylesheet_refs: Vec<String>,
    pub cookies: Vec<String>,
    pub response_headers: HashMap<String, String>,
    /// Redirect targets observed for the session, in hop order
    pub redirect_urls: Vec<String>,
}

/// Borrowed view of one selector-addressable field.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Text(&'a str),
    List(&'a [String]),
}

impl FeatureRecord {
    /// Resolve a selector field name to its value.
    ///
    /// Names follow the upstream collector: `title`, `hostname`, `dom`,
    /// `html`, `js`, `css`, `cookies`, `requests`. `response_headers` is a
    /// map and deliberately not addressable - the collector never populated
    /// a `headers` field, so an entry naming it fails like any missing
    /// field.
    pub fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "title" => Some(FieldRef::List(&self.title)),
            "hostname" => Some(FieldRef::Text(&self.hostname)),
            "dom" => Some(FieldRef::Text(&self.dom_snapshot)),
            "html" => Some(FieldRef::Text(&self.html_snapshot)),
            "js" => Some(FieldRef::List(&self.scripts)),
            "css" => Some(FieldRef::List(&self.stylesheet_refs)),
            "cookies" => Some(FieldRef::List(&self.cookies)),
            "requests" => Some(FieldRef::List(&self.redirect_urls)),
            _ => None,
        }
    }
}
