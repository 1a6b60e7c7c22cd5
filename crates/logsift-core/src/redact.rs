//! Sensitive-field redaction.
//!
//! [`redact_record`] returns a masked copy and never mutates its input;
//! callers keep the unredacted original around for history and undo. A key
//! matches when its lowercase form contains any configured pattern
//! substring. Masked keys get a `<key>_redacted: true` sibling immediately
//! after them; that sibling doubles as the guard that makes a second
//! redaction pass a no-op.

use crate::node::{Node, Object, Record};
use serde::{Deserialize, Serialize};

/// Key substrings treated as sensitive, matched case-insensitively.
pub const SENSITIVE_KEY_PATTERNS: [&str; 9] = [
    "public_key",
    "private_key",
    "secret",
    "token",
    "api_key",
    "password",
    "credential",
    "auth",
    "authorization",
];

/// Replacement for values too short to keep any characters from.
pub const MASK_TOKEN: &str = "[REDACTED]";

/// Suffix of the marker fields the engine inserts next to masked keys.
const REDACTED_SUFFIX: &str = "_redacted";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedactionConfig {
    pub enabled: bool,
    /// How many leading and trailing characters of a masked value survive.
    pub keep_chars: usize,
    /// Case-insensitive substrings that mark a key as sensitive.
    pub patterns: Vec<String>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            keep_chars: 4,
            patterns: SENSITIVE_KEY_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RedactionConfig {
    pub fn enabled_with(keep_chars: usize) -> Self {
        Self { enabled: true, keep_chars, ..Self::default() }
    }

    fn is_sensitive(&self, key: &str) -> bool {
        // Marker fields live in their own namespace and are never re-masked.
        if key.ends_with(REDACTED_SUFFIX) {
            return false;
        }
        let lower = key.to_ascii_lowercase();
        self.patterns.iter().any(|p| lower.contains(p.as_str()))
    }
}

/// Produce a redacted copy of `record`. With redaction disabled this is a
/// structurally identical deep copy.
pub fn redact_record(record: &Record, config: &RedactionConfig) -> Record {
    if !config.enabled {
        return record.clone();
    }
    Record::new(redact_object(&record.fields, config))
}

fn redact_object(object: &Object, config: &RedactionConfig) -> Object {
    let mut out = Object::with_capacity(object.len());
    for (key, value) in object {
        if config.is_sensitive(key) {
            let marker = format!("{key}{REDACTED_SUFFIX}");
            let already = object.get(&marker).and_then(Node::as_bool).unwrap_or(false);
            match value {
                // Containers keep their structure; masking applies to the
                // leaves inside them.
                Node::Object(_) | Node::Array(_) => {
                    out.insert(key.clone(), redact_node(value, config));
                }
                _ if already => {
                    // Masked on a previous pass; copy through untouched.
                    out.insert(key.clone(), value.clone());
                }
                _ => {
                    let masked = mask_value(&value.to_plain_string(), config.keep_chars);
                    out.insert(key.clone(), Node::String(masked));
                    out.insert(marker, Node::Bool(true));
                }
            }
        } else if key.ends_with(REDACTED_SUFFIX) && out.contains_key(key) {
            // Marker we just inserted ourselves; the original copy (from a
            // prior pass) is already in place.
        } else {
            out.insert(key.clone(), redact_node(value, config));
        }
    }
    out
}

fn redact_node(node: &Node, config: &RedactionConfig) -> Node {
    match node {
        Node::Object(obj) => Node::Object(redact_object(obj, config)),
        Node::Array(items) => {
            Node::Array(items.iter().map(|item| redact_node(item, config)).collect())
        }
        Node::Null | Node::Bool(_) | Node::Number(_) | Node::String(_) => node.clone(),
    }
}

/// Mask `value`, keeping `keep` characters at each end when the value is
/// long enough to reveal that much without giving everything away.
fn mask_value(value: &str, keep: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > keep * 2 {
        let prefix: String = chars[..keep].iter().collect();
        let suffix: String = chars[chars.len() - keep..].iter().collect();
        format!("{prefix}...{suffix}")
    } else {
        MASK_TOKEN.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, Node)]) -> Record {
        let mut obj = Object::new();
        for (key, value) in pairs {
            obj.insert(key.to_string(), value.clone());
        }
        Record::new(obj)
    }

    #[test]
    fn masks_long_value_keeping_ends() {
        let rec = record(&[("api_key", Node::from("abcd1234567890wxyz"))]);
        let redacted = redact_record(&rec, &RedactionConfig::enabled_with(4));
        assert_eq!(redacted.get("api_key"), Some(&Node::from("abcd...wxyz")));
        assert_eq!(redacted.get("api_key_redacted"), Some(&Node::Bool(true)));
    }

    #[test]
    fn marker_sits_immediately_after_masked_key() {
        let rec = record(&[
            ("before", Node::from("x")),
            ("secret", Node::from("abcdefghijklmnop")),
            ("after", Node::from("y")),
        ]);
        let redacted = redact_record(&rec, &RedactionConfig::enabled_with(2));
        let keys: Vec<&str> = redacted.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["before", "secret", "secret_redacted", "after"]);
    }

    #[test]
    fn short_value_gets_the_fixed_token() {
        let rec = record(&[("password", Node::from("hunter2"))]);
        let redacted = redact_record(&rec, &RedactionConfig::enabled_with(4));
        assert_eq!(redacted.get("password"), Some(&Node::from(MASK_TOKEN)));
    }

    #[test]
    fn zero_keep_chars_reveals_nothing() {
        let rec = record(&[("token", Node::from("abcdef"))]);
        let redacted = redact_record(&rec, &RedactionConfig::enabled_with(0));
        assert_eq!(redacted.get("token"), Some(&Node::from("...")));
    }

    #[test]
    fn key_match_is_case_insensitive_substring() {
        let rec = record(&[("X-Api-Key-Header", Node::from("abcdefghijkl"))]);
        let config = RedactionConfig {
            enabled: true,
            keep_chars: 2,
            patterns: vec!["api-key".to_string()],
        };
        let redacted = redact_record(&rec, &config);
        assert_eq!(redacted.get("X-Api-Key-Header"), Some(&Node::from("ab...kl")));
    }

    #[test]
    fn non_string_sensitive_values_are_stringified() {
        let rec = record(&[("secret", Node::from(1234567890))]);
        let redacted = redact_record(&rec, &RedactionConfig::enabled_with(2));
        assert_eq!(redacted.get("secret"), Some(&Node::from("12...90")));
        assert_eq!(redacted.get("secret_redacted"), Some(&Node::Bool(true)));
    }

    #[test]
    fn recurses_into_nested_objects_and_arrays() {
        let mut inner = Object::new();
        inner.insert("name".to_string(), Node::from("svc"));
        inner.insert("auth_token".to_string(), Node::from("0123456789abcdef"));
        let rec = record(&[(
            "servers",
            Node::Array(vec![Node::Object(inner)]),
        )]);
        let redacted = redact_record(&rec, &RedactionConfig::enabled_with(3));
        let servers = redacted.get("servers").unwrap().as_array().unwrap();
        let obj = servers[0].as_object().unwrap();
        assert_eq!(obj["name"], Node::from("svc"));
        assert_eq!(obj["auth_token"], Node::from("012...def"));
        assert_eq!(obj["auth_token_redacted"], Node::Bool(true));
    }

    #[test]
    fn disabled_config_is_identity_copy() {
        let rec = record(&[("secret", Node::from("abcdefghij"))]);
        let config = RedactionConfig::default();
        assert!(!config.enabled);
        assert_eq!(redact_record(&rec, &config), rec);
    }

    #[test]
    fn input_record_is_never_mutated() {
        let rec = record(&[("token", Node::from("abcdefghijklmnop"))]);
        let snapshot = rec.clone();
        let _ = redact_record(&rec, &RedactionConfig::enabled_with(4));
        assert_eq!(rec, snapshot);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let rec = record(&[("api_key", Node::from("abcd1234567890wxyz"))]);
        let config = RedactionConfig::enabled_with(4);
        let once = redact_record(&rec, &config);
        let twice = redact_record(&once, &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn marker_fields_are_not_masked_themselves() {
        let rec = record(&[("api_key", Node::from("abcd1234567890wxyz"))]);
        let redacted = redact_record(&rec, &RedactionConfig::enabled_with(4));
        // "api_key_redacted" contains "api_key" but must stay a boolean.
        assert_eq!(redacted.get("api_key_redacted"), Some(&Node::Bool(true)));
    }
}
