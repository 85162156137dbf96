//! Which nodes start expanded while a search is active.
//!
//! A node expands when the dot-joined form of some match path starts with the
//! dot-joined form of the node's path. The comparison is on joined strings, not
//! on segments, so a match at `a.bc` also expands a node at `a.b`. Viewers rely
//! on this exact behaviour; it is kept as is.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::path::KeyPath;

pub fn should_expand(node: &KeyPath, matches: &[KeyPath]) -> bool {
    let prefix = node.joined();
    matches.iter().any(|m| m.joined().starts_with(&prefix))
}

/// Joined match paths computed once, for checking many nodes against the same match list.
#[derive(Debug, Clone, Default)]
pub struct ExpandSet {
    joined: Vec<String>,
}

impl ExpandSet {
    pub fn new(matches: &[KeyPath]) -> Self {
        ExpandSet { joined: matches.iter().map(KeyPath::joined).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }

    pub fn contains(&self, node: &KeyPath) -> bool {
        let prefix = node.joined();
        self.joined.iter().any(|m| m.starts_with(&prefix))
    }
}

/// Every container path in `tree` that starts expanded.
///
/// Paths are built from `tree` itself, so for a pruned tree array segments are
/// positions in the compacted array.
pub fn expanded_paths(tree: &Value, matches: &[KeyPath]) -> BTreeSet<KeyPath> {
    let set = ExpandSet::new(matches);
    let mut out = BTreeSet::new();
    if set.is_empty() {
        return out;
    }
    let mut stack = vec![(tree, KeyPath::root())];
    while let Some((value, path)) = stack.pop() {
        let children: Vec<(String, &Value)> = match value {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Array(arr) => arr.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
            _ => continue,
        };
        if !set.contains(&path) {
            continue;
        }
        for (key, child) in children.into_iter().rev() {
            stack.push((child, path.child(&key)));
        }
        out.insert(path);
    }
    out
}
