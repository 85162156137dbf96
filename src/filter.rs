//! Search-and-prune over a document tree.
//!
//! [`filter`] walks a value depth-first and returns a pruned copy holding only
//! the branches that contain a match, together with the ordered list of
//! key-paths where something matched. A key whose name contains the term keeps
//! its whole subtree verbatim. Only string leaves and keys are searched;
//! numbers, booleans and null never match by value.
//!
//! Match paths are produced depth-first. Within one entry the matches found
//! inside its value come before the entry's own key match, and a location whose
//! key and string value both match is listed twice.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::path::KeyPath;

/// A search term normalised at the boundary: trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        SearchTerm(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SearchTerm {
    fn from(raw: &str) -> Self {
        SearchTerm::new(raw)
    }
}

/// Result of filtering one node. `value` is `None` when the branch is pruned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pruned {
    pub value: Option<Value>,
    pub matches: Vec<KeyPath>,
}

impl Pruned {
    fn absent() -> Self {
        Pruned::default()
    }

    fn hit(value: Value, path: KeyPath) -> Self {
        Pruned { value: Some(value), matches: vec![path] }
    }
}

/// What the presentation layer renders: always a value, never absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub tree: Value,
    pub matches: Vec<KeyPath>,
}

/// Filter engine. Stateless apart from its fan-out setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFilter {
    parallel_min_children: Option<usize>,
}

struct Visited<'v> {
    key: String,
    original: &'v Value,
    key_matches: bool,
    child: Pruned,
}

impl TreeFilter {
    pub fn sequential() -> Self {
        TreeFilter { parallel_min_children: None }
    }

    /// Containers with at least `min_children` entries filter their entries on
    /// the rayon pool. Output is identical to the sequential engine.
    pub fn parallel(min_children: usize) -> Self {
        TreeFilter { parallel_min_children: Some(min_children.max(1)) }
    }

    pub fn with_parallel_min_children(min_children: Option<usize>) -> Self {
        match min_children {
            Some(n) => TreeFilter::parallel(n),
            None => TreeFilter::sequential(),
        }
    }

    /// Filters `value`, located at `path`, by an already-lowercased, non-empty `term`.
    pub fn filter(&self, value: &Value, term: &str, path: &KeyPath) -> Pruned {
        match value {
            Value::String(s) => {
                if s.to_lowercase().contains(term) {
                    Pruned::hit(value.clone(), path.clone())
                } else {
                    Pruned::absent()
                }
            }
            Value::Object(map) => {
                let entries = map.iter().map(|(k, v)| (k.clone(), v)).collect();
                let mut kept = Map::new();
                let mut matches = Vec::new();
                for entry in self.visit(entries, term, path) {
                    let keep = merge(entry, path, &mut matches);
                    if let Some((key, v)) = keep {
                        kept.insert(key, v);
                    }
                }
                if kept.is_empty() {
                    Pruned::absent()
                } else {
                    Pruned { value: Some(Value::Object(kept)), matches }
                }
            }
            Value::Array(arr) => {
                let entries = arr.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect();
                let mut kept = Vec::new();
                let mut matches = Vec::new();
                for entry in self.visit(entries, term, path) {
                    if let Some((_, v)) = merge(entry, path, &mut matches) {
                        kept.push(v);
                    }
                }
                if kept.is_empty() {
                    Pruned::absent()
                } else {
                    Pruned { value: Some(Value::Array(kept)), matches }
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => Pruned::absent(),
        }
    }

    /// Top-level policy: an empty term returns the document untouched, otherwise
    /// the result is always a value (an empty object when nothing matched or
    /// there is no document).
    pub fn filter_document(&self, doc: Option<&Value>, term: &SearchTerm) -> FilterOutcome {
        if term.is_empty() {
            return FilterOutcome {
                tree: doc.cloned().unwrap_or(Value::Null),
                matches: Vec::new(),
            };
        }
        let Some(doc) = doc else {
            return FilterOutcome { tree: Value::Object(Map::new()), matches: Vec::new() };
        };
        let Pruned { value, matches } = self.filter(doc, term.as_str(), &KeyPath::root());
        log::debug!("filter {:?}: {} matches", term.as_str(), matches.len());
        FilterOutcome {
            tree: value.unwrap_or_else(|| Value::Object(Map::new())),
            matches,
        }
    }

    fn visit<'v>(&self, entries: Vec<(String, &'v Value)>, term: &str, path: &KeyPath) -> Vec<Visited<'v>> {
        let visit_one = |(key, original): (String, &'v Value)| {
            let child_path = path.child(&key);
            let key_matches = key.to_lowercase().contains(term);
            let child = self.filter(original, term, &child_path);
            Visited { key, original, key_matches, child }
        };
        match self.parallel_min_children {
            Some(min) if entries.len() >= min => entries.into_par_iter().map(visit_one).collect(),
            _ => entries.into_iter().map(visit_one).collect(),
        }
    }
}

// Appends the entry's matches in order and returns what the parent keeps, if anything.
fn merge(entry: Visited<'_>, parent: &KeyPath, matches: &mut Vec<KeyPath>) -> Option<(String, Value)> {
    let Visited { key, original, key_matches, child } = entry;
    matches.extend(child.matches);
    if key_matches {
        matches.push(parent.child(&key));
        Some((key, original.clone()))
    } else {
        child.value.map(|v| (key, v))
    }
}

/// Filters with the sequential engine.
pub fn filter(value: &Value, term: &str, path: &KeyPath) -> Pruned {
    TreeFilter::sequential().filter(value, term, path)
}

pub fn filter_document(doc: Option<&Value>, term: &SearchTerm) -> FilterOutcome {
    TreeFilter::sequential().filter_document(doc, term)
}
