use serde_json::Value;

use crate::error::{Error, Result};
use crate::expand::ExpandSet;
use crate::path::KeyPath;
use crate::types::{ChildPage, Node};

pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((end, _)) => format!("{}…", &s[..end]),
    }
}

fn describe(v: &Value, preview_len: usize) -> (&'static str, usize, String) {
    match v {
        Value::Object(m) => (
            "object",
            m.len(),
            if m.is_empty() {
                format!("{{}} {} keys", m.len())
            } else {
                format!("{{…}} {} keys", m.len())
            },
        ),
        Value::Array(a) => (
            "array",
            a.len(),
            if a.is_empty() {
                format!("[] {} items", a.len())
            } else {
                format!("[…] {} items", a.len())
            },
        ),
        Value::String(s) => ("string", 0, truncate(s, preview_len)),
        Value::Number(n) => ("number", 0, n.to_string()),
        Value::Bool(b) => ("boolean", 0, b.to_string()),
        Value::Null => ("null", 0, "null".into()),
    }
}

pub fn to_node(path: KeyPath, v: &Value, preview_len: usize, expand: &ExpandSet) -> Node {
    let (value_type, child_count, preview) = describe(v, preview_len);
    let has_children = child_count > 0;
    Node {
        pointer: path.to_pointer(),
        key: path.last().map(str::to_string),
        value_type: value_type.into(),
        has_children,
        child_count,
        preview,
        expanded: has_children && expand.contains(&path),
        path,
    }
}

/// One page of the children of the container at `path` in `root`.
///
/// `expand` decides each node's `expanded` flag; pass an empty set when no
/// search is active.
pub fn list_children(
    root: &Value,
    path: &KeyPath,
    offset: usize,
    limit: usize,
    preview_len: usize,
    expand: &ExpandSet,
) -> Result<ChildPage> {
    let target = path
        .resolve(root)
        .ok_or_else(|| Error::InvalidPath(path.joined()))?;
    let (total_count, nodes) = match target {
        Value::Object(map) => (
            map.len(),
            map.iter()
                .skip(offset)
                .take(limit)
                .map(|(k, v)| to_node(path.child(k), v, preview_len, expand))
                .collect(),
        ),
        Value::Array(arr) => (
            arr.len(),
            arr.iter()
                .enumerate()
                .skip(offset)
                .take(limit)
                .map(|(i, v)| to_node(path.child(&i.to_string()), v, preview_len, expand))
                .collect(),
        ),
        _ => (0, vec![]),
    };
    Ok(ChildPage {
        nodes,
        total_count,
        has_more: offset.saturating_add(limit) < total_count,
    })
}
