//! Domain-specific assertion helpers for logsift harnesses.
//!
//! These add context-rich failure messages that name the record field and
//! show what is actually present, instead of a bare `Option` mismatch.

use logsift_core::{Node, Record};

/// Assert that a record field holds a specific string value.
///
/// ```rust
/// assert_str_field!(record, "id", "123");
/// ```
#[macro_export]
macro_rules! assert_str_field {
    ($record:expr, $key:expr, $value:expr) => {{
        let record: &logsift_core::Record = &$record;
        let key: &str = $key;
        match record.get(key) {
            Some(logsift_core::Node::String(actual)) if actual == $value => {}
            Some(actual) => panic!(
                "assert_str_field! failed:\n  record[{:?}]\n  expected: {:?}\n  actual:   {:?}",
                key, $value, actual
            ),
            None => panic!(
                "assert_str_field! failed: field {:?} not found.\n  Available fields: {:?}",
                key,
                record.fields.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert that a masked field carries its `<key>_redacted: true` sibling
/// directly after it.
#[macro_export]
macro_rules! assert_redacted {
    ($record:expr, $key:expr) => {{
        let record: &logsift_core::Record = &$record;
        let key: &str = $key;
        let marker = format!("{key}_redacted");
        match record.get(&marker) {
            Some(logsift_core::Node::Bool(true)) => {}
            other => panic!(
                "assert_redacted! failed: expected {:?} to be true, got {:?}.\n  Fields: {:?}",
                marker,
                other,
                record.fields.keys().collect::<Vec<_>>()
            ),
        }
        let keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        let key_pos = keys.iter().position(|k| *k == key);
        let marker_pos = keys.iter().position(|k| *k == marker);
        assert_eq!(
            marker_pos,
            key_pos.map(|p| p + 1),
            "marker {marker:?} must sit immediately after {key:?}; key order: {keys:?}"
        );
    }};
}

/// The exact key order of a record, for order-preservation assertions.
pub fn key_order(record: &Record) -> Vec<&str> {
    record.fields.keys().map(String::as_str).collect()
}

/// Fetch a nested node by a `/`-separated path, panicking with context when
/// a step is missing.
pub fn lookup<'a>(record: &'a Record, path: &str) -> &'a Node {
    let mut steps = path.split('/');
    let first = steps.next().expect("path must not be empty");
    let mut node = record
        .get(first)
        .unwrap_or_else(|| panic!("no field {first:?} in {:?}", key_order(record)));
    for step in steps {
        node = match node {
            Node::Object(obj) => obj
                .get(step)
                .unwrap_or_else(|| panic!("no field {step:?} under {path:?}")),
            Node::Array(items) => {
                let idx: usize = step.parse().unwrap_or_else(|_| {
                    panic!("path step {step:?} is not an index into an array")
                });
                items
                    .get(idx)
                    .unwrap_or_else(|| panic!("index {idx} out of bounds under {path:?}"))
            }
            other => panic!("cannot descend into {other:?} at {step:?}"),
        };
    }
    node
}
