//! Dotted-path flattening of nested JSON objects

use serde_json::{Map, Value};

/// Single-level mapping from dotted paths to leaf values
pub type Flattened = Map<String, Value>;

/// Flatten a nested object into dotted-path keys.
///
/// Nested objects are walked recursively; every other value (arrays included)
/// is bound as a leaf under its full path. Calling this with a non-object
/// yields an empty map, since only object-valued fields are ever flattened.
pub fn flatten(value: &Value, prefix: &str) -> Flattened {
    let mut out = Flattened::new();
    flatten_into(value, prefix, &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Flattened) {
    let Value::Object(map) = value else {
        return;
    };

    for (key, child) in map {
        let child_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match child {
            Value::Object(_) => flatten_into(child, &child_key, out),
            leaf => {
                out.insert(child_key, leaf.clone());
            }
        }
    }
}
