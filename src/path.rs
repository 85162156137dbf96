use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Location of a node inside a document: one segment per object key or
/// stringified array index. The root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns a new path with `key` appended.
    pub fn child(&self, key: &str) -> KeyPath {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(key.to_string());
        KeyPath(segments)
    }

    /// Dot-joined form used by the expand rule, e.g. `["a","0","b"]` -> `"a.0.b"`.
    pub fn joined(&self) -> String {
        self.0.join(".")
    }

    /// JSON Pointer (RFC 6901) form, root is `""`.
    pub fn to_pointer(&self) -> String {
        self.0
            .iter()
            .map(|s| format!("/{}", escape_pointer_token(s)))
            .collect()
    }

    /// Parses a JSON Pointer. Anything not starting with `/` (other than `""`) is rejected.
    pub fn from_pointer(pointer: &str) -> Option<KeyPath> {
        if pointer.is_empty() {
            return Some(KeyPath::root());
        }
        let rest = pointer.strip_prefix('/')?;
        Some(rest.split('/').map(unescape_pointer_token).collect())
    }

    /// Parses a dot-joined path. Keys that themselves contain dots can only be
    /// addressed through [`KeyPath::from_pointer`].
    pub fn from_dotted(dotted: &str) -> KeyPath {
        if dotted.is_empty() {
            return KeyPath::root();
        }
        dotted.split('.').collect()
    }

    /// Parses either notation: pointers start with `/`, everything else is dotted.
    pub fn parse(s: &str) -> KeyPath {
        match KeyPath::from_pointer(s) {
            Some(path) if s.starts_with('/') => path,
            _ => KeyPath::from_dotted(s),
        }
    }

    /// Walks `root` along this path. Array segments must be decimal indices.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.0.iter().try_fold(root, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
            _ => None,
        })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        KeyPath(iter.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        segments.iter().copied().collect()
    }
}

// JSON Pointer token escape (~0, ~1)
pub fn escape_pointer_token(raw: &str) -> String {
    raw.replace('~', "~0").replace('/', "~1")
}

pub fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}
