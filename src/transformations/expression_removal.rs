use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Remove expression strings from every property value in the JSON tree
///
/// Recursively traverses the JSON tree and removes every `x` field whose value
/// is a string. In Lottie documents a string `x` is an After Effects expression;
/// once removed, the renderer falls back to the property's keyframes or static
/// value. `x` fields holding numbers, arrays or objects (easing handles, split
/// position components) are data and are kept.
///
/// Visited nodes are tracked by identity, not by value: a node reached a
/// second time is stripped again but not descended into, and two structurally
/// equal nodes at different places in the tree are both processed.
///
/// Run this after [`expand_tm_cycles`](super::expand_tm_cycles), otherwise the
/// cyclic time-remap expressions are lost before they can be expanded.
///
/// # Arguments
/// * `tree` - The JSON tree to modify (usually the document root)
///
/// # Returns
/// * `usize` - Number of expression fields removed
///
/// # Examples
/// ```
/// use lottie_prep::transformations::strip_expressions;
/// use serde_json::json;
///
/// let mut tree = json!({
///     "ks": {"o": {"a": 0, "k": 100, "x": "wiggle(2, 10)"}}
/// });
/// assert_eq!(strip_expressions(&mut tree), 1);
/// assert!(tree["ks"]["o"].get("x").is_none());
/// ```
pub fn strip_expressions(tree: &mut JsonValue) -> usize {
    let mut visited = HashSet::new();
    strip_recursive(tree, &mut visited)
}

/// Recursively strip expressions, descending into each node at most once
fn strip_recursive(value: &mut JsonValue, visited: &mut HashSet<*const JsonValue>) -> usize {
    let mut stripped = 0;

    if let JsonValue::Object(map) = value {
        if map.get("x").is_some_and(JsonValue::is_string) {
            map.remove("x");
            stripped += 1;
        }
    }

    if !visited.insert(value as *const JsonValue) {
        return stripped;
    }

    match value {
        JsonValue::Object(map) => {
            for val in map.values_mut() {
                stripped += strip_recursive(val, visited);
            }
        }
        JsonValue::Array(arr) => {
            for val in arr.iter_mut() {
                stripped += strip_recursive(val, visited);
            }
        }
        _ => {
            // Primitives - nothing to do
        }
    }

    stripped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_transform_expressions() {
        let mut tree = json!({
            "layers": [{
                "nm": "Shape",
                "ks": {
                    "o": {"a": 0, "k": 100, "x": "wiggle(2, 10)"},
                    "r": {"a": 0, "k": 0, "x": "time * 36"},
                    "s": {"a": 0, "k": [100, 100, 100]}
                }
            }]
        });

        let count = strip_expressions(&mut tree);

        assert_eq!(count, 2);
        assert!(tree["layers"][0]["ks"]["o"].get("x").is_none());
        assert!(tree["layers"][0]["ks"]["r"].get("x").is_none());
        assert_eq!(tree["layers"][0]["ks"]["o"]["k"].as_i64(), Some(100));
        assert_eq!(tree["layers"][0]["ks"]["s"], json!({"a": 0, "k": [100, 100, 100]}));
    }

    #[test]
    fn test_strip_keeps_non_string_x() {
        let mut tree = json!({
            "ks": {
                "p": {
                    "s": true,
                    "x": {"a": 0, "k": 10, "x": "value + 1"},
                    "y": {"a": 0, "k": 20}
                }
            },
            "k": [{
                "t": 0,
                "o": {"x": [0.33], "y": [0]},
                "i": {"x": 0.67, "y": 1}
            }]
        });

        let count = strip_expressions(&mut tree);

        assert_eq!(count, 1);
        assert!(tree["ks"]["p"]["x"].is_object());
        assert!(tree["ks"]["p"]["x"].get("x").is_none());
        assert_eq!(tree["ks"]["p"]["x"]["k"].as_i64(), Some(10));
        assert_eq!(tree["k"][0]["o"]["x"], json!([0.33]));
        assert_eq!(tree["k"][0]["i"]["x"].as_f64(), Some(0.67));
    }

    #[test]
    fn test_strip_structurally_equal_siblings() {
        let mut tree = json!({
            "a": {"k": 1, "x": "loopOut('pingpong')"},
            "b": {"k": 1, "x": "loopOut('pingpong')"},
            "c": [
                {"k": 1, "x": "loopOut('pingpong')"},
                {"k": 1, "x": "loopOut('pingpong')"}
            ]
        });

        let count = strip_expressions(&mut tree);

        assert_eq!(count, 4);
        assert_eq!(tree["a"], json!({"k": 1}));
        assert_eq!(tree["b"], json!({"k": 1}));
        assert_eq!(tree["c"], json!([{"k": 1}, {"k": 1}]));
    }

    #[test]
    fn test_strip_root_expression() {
        let mut tree = json!({"x": "thisComp.layer(1)", "k": 0});

        assert_eq!(strip_expressions(&mut tree), 1);
        assert_eq!(tree, json!({"k": 0}));
    }

    #[test]
    fn test_strip_deeply_nested() {
        let mut tree = json!({
            "assets": [{
                "layers": [{
                    "shapes": [{
                        "it": [{
                            "ty": "fl",
                            "c": {"a": 0, "k": [1, 0, 0, 1], "x": "comp('x').layer(1)"}
                        }]
                    }]
                }]
            }]
        });

        assert_eq!(strip_expressions(&mut tree), 1);
        assert!(tree["assets"][0]["layers"][0]["shapes"][0]["it"][0]["c"]
            .get("x")
            .is_none());
    }

    #[test]
    fn test_strip_without_expressions() {
        let mut tree = json!({
            "v": "5.7.4",
            "layers": [{"ks": {"o": {"a": 0, "k": 100}}}]
        });
        let original = tree.clone();

        assert_eq!(strip_expressions(&mut tree), 0);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_strip_primitives() {
        let mut tree = json!("x");
        assert_eq!(strip_expressions(&mut tree), 0);
        assert_eq!(tree, json!("x"));

        let mut tree = json!(null);
        assert_eq!(strip_expressions(&mut tree), 0);
    }

    #[test]
    fn test_revisit_strips_without_descending() {
        let mut node = json!({
            "x": "time",
            "child": {"x": "value"}
        });
        let mut visited = HashSet::new();
        visited.insert(&node as *const JsonValue);

        let count = strip_recursive(&mut node, &mut visited);

        assert_eq!(count, 1);
        assert!(node.get("x").is_none());
        assert_eq!(node["child"]["x"].as_str(), Some("value"));
    }
}
