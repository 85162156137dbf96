use serde_json::Value;

use crate::error::{Error, Result};

/// Default nesting limit, the same recursion limit `serde_json` applies while parsing.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Number of nested containers on the deepest path. Scalars are depth 0, `{}` and `[]` are 1.
pub fn nesting_depth(value: &Value) -> usize {
    deepest(value, None)
}

/// Rejects documents nested deeper than `limit` before they reach the recursive filter.
pub fn check_depth(value: &Value, limit: usize) -> Result<()> {
    let depth = deepest(value, Some(limit));
    if depth > limit {
        log::warn!("rejecting document: nesting depth exceeds {limit}");
        return Err(Error::TooDeep { depth, limit });
    }
    Ok(())
}

// Iterative walk; stops at the first container past `stop_after`.
fn deepest(root: &Value, stop_after: Option<usize>) -> usize {
    let mut max = 0;
    let mut stack: Vec<(&Value, usize)> = vec![(root, 0)];
    while let Some((value, depth)) = stack.pop() {
        if !matches!(value, Value::Object(_) | Value::Array(_)) {
            continue;
        }
        let here = depth + 1;
        max = max.max(here);
        if stop_after.is_some_and(|limit| here > limit) {
            return here;
        }
        match value {
            Value::Object(map) => stack.extend(map.values().map(|child| (child, here))),
            Value::Array(arr) => stack.extend(arr.iter().map(|child| (child, here))),
            _ => {}
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(levels: usize) -> Value {
        (0..levels).fold(json!("leaf"), |inner, _| json!({ "n": inner }))
    }

    #[test]
    fn measures_container_depth() {
        assert_eq!(nesting_depth(&json!(1)), 0);
        assert_eq!(nesting_depth(&json!({})), 1);
        assert_eq!(nesting_depth(&json!([[], {"a": [1]}])), 3);
        assert_eq!(nesting_depth(&nested(10)), 10);
    }

    #[test]
    fn check_depth_enforces_limit() {
        assert!(check_depth(&nested(5), 5).is_ok());
        match check_depth(&nested(6), 5) {
            Err(Error::TooDeep { depth, limit }) => {
                assert_eq!(limit, 5);
                assert_eq!(depth, 6);
            }
            other => panic!("expected TooDeep, got {other:?}"),
        }
    }

    #[test]
    fn handles_very_deep_values_without_recursing() {
        let deep = nested(1_000);
        assert!(check_depth(&deep, DEFAULT_MAX_DEPTH).is_err());
        assert_eq!(nesting_depth(&deep), 1_000);
    }
}
