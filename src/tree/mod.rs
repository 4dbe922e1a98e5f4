//! Dotted-path lookup and merging over a [`ConfigTree`].

use crate::domain::ConfigTree;
use serde_json::Value;

/// Look up `key` (e.g. `"database.connections.mysql"`) in `tree`.
///
/// An empty key returns the whole tree. Every segment is a mapping-key
/// lookup; the first missing segment or non-mapping value yields `default`.
pub fn resolve(tree: &ConfigTree, key: &str, default: Value) -> Value {
    lookup(tree, key).cloned().unwrap_or_else(|| {
        if key.is_empty() {
            Value::Object(tree.clone())
        } else {
            default
        }
    })
}

/// Whether `key` resolves to a value in `tree`.
pub fn contains(tree: &ConfigTree, key: &str) -> bool {
    key.is_empty() || lookup(tree, key).is_some()
}

fn lookup<'a>(tree: &'a ConfigTree, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }
    let mut segments = key.split('.');
    let first = segments.next()?;
    let mut current = tree.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Overlay `top` onto `base` key by key; entries from `top` win.
pub fn overlay(base: &mut ConfigTree, top: ConfigTree) {
    for (key, value) in top {
        base.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> ConfigTree {
        match value {
            Value::Object(map) => map,
            _ => panic!("test tree must be an object"),
        }
    }

    #[test]
    fn test_resolve_nested_key() {
        let t = tree(json!({"a": {"b": {"c": 1}}}));
        assert_eq!(resolve(&t, "a.b.c", json!("D")), json!(1));
        assert_eq!(resolve(&t, "a.b", Value::Null), json!({"c": 1}));
    }

    #[test]
    fn test_resolve_missing_returns_default() {
        let t = ConfigTree::new();
        assert_eq!(resolve(&t, "x.y", json!("D")), json!("D"));
    }

    #[test]
    fn test_resolve_through_scalar_returns_default() {
        let t = tree(json!({"a": {"b": 5}}));
        assert_eq!(resolve(&t, "a.b.c", json!(false)), json!(false));
    }

    #[test]
    fn test_resolve_does_not_index_lists() {
        let t = tree(json!({"hosts": ["a", "b"]}));
        assert_eq!(resolve(&t, "hosts.0", Value::Null), Value::Null);
    }

    #[test]
    fn test_empty_key_returns_whole_tree() {
        let t = tree(json!({"app": {"name": "MyApp"}}));
        assert_eq!(resolve(&t, "", Value::Null), json!({"app": {"name": "MyApp"}}));
        assert!(contains(&t, ""));
    }

    #[test]
    fn test_contains() {
        let t = tree(json!({"app": {"debug": null}}));
        assert!(contains(&t, "app.debug"));
        assert!(!contains(&t, "app.name"));
    }

    #[test]
    fn test_overlay_replaces_top_level_keys() {
        let mut base = tree(json!({"app": {"name": "old"}, "db": {"host": "x"}}));
        overlay(&mut base, tree(json!({"app": {"url": "new"}})));
        assert_eq!(Value::Object(base), json!({"app": {"url": "new"}, "db": {"host": "x"}}));
    }
}
