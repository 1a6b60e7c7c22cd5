//! Scalar typing and the optional base64 decode pass.
//!
//! Numbers prefer `i64`, fall back to finite `f64`, and keep the literal
//! text when neither fits; type drift is worse than a stringly value.
//! The base64 pass rewrites string values in place after parsing; it is a
//! heuristic and must never fail: a value that merely looks like base64 but
//! does not decode to clean UTF-8 is left untouched.

use crate::node::{Node, Number};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Type a raw numeric literal.
pub fn number(raw: &str) -> Node {
    if let Ok(n) = raw.parse::<i64>() {
        return Node::Number(Number::Int(n));
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Node::Number(Number::Float(f)),
        _ => Node::String(raw.to_string()),
    }
}

/// Walk the tree, replacing every string value that passes the base64 gate
/// with its decoded form. Keys are never rewritten.
pub fn decode_base64_strings(node: &mut Node) {
    match node {
        Node::String(s) => {
            if let Some(decoded) = try_decode(s) {
                *s = decoded;
            }
        }
        Node::Array(items) => {
            for item in items {
                decode_base64_strings(item);
            }
        }
        Node::Object(obj) => {
            for value in obj.values_mut() {
                decode_base64_strings(value);
            }
        }
        Node::Null | Node::Bool(_) | Node::Number(_) => {}
    }
}

/// Shape gate: long enough to be meaningful, padded length, standard
/// alphabet, `=` only at the tail. Short tokens decode to garbage far too
/// often to be worth attempting.
fn is_base64_shaped(s: &str) -> bool {
    if s.len() < 8 || s.len() % 4 != 0 {
        return false;
    }
    let trimmed = s.trim_end_matches('=');
    if s.len() - trimmed.len() > 2 {
        return false;
    }
    !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

fn try_decode(s: &str) -> Option<String> {
    if !is_base64_shaped(s) {
        return None;
    }
    let bytes = STANDARD.decode(s).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integers_stay_integers() {
        assert_eq!(number("42"), Node::Number(Number::Int(42)));
        assert_eq!(number("-7"), Node::Number(Number::Int(-7)));
        assert_eq!(
            number("9223372036854775807"),
            Node::Number(Number::Int(i64::MAX))
        );
    }

    #[test]
    fn oversized_integers_become_floats() {
        // One past i64::MAX still fits a finite f64.
        assert_eq!(
            number("9223372036854775808"),
            Node::Number(Number::Float(9.223372036854776e18))
        );
    }

    #[test]
    fn absurd_exponents_fall_back_to_string() {
        // f64 overflow parses to infinity; the literal is kept as a string.
        assert_eq!(number("1e999"), Node::String("1e999".to_string()));
    }

    #[test]
    fn decodes_clean_base64() {
        let mut node = Node::from("SGVsbG8sIHdvcmxkISEh");
        decode_base64_strings(&mut node);
        assert_eq!(node, Node::from("Hello, world!!!"));
    }

    #[test]
    fn decodes_padded_base64() {
        let mut node = Node::from("bG9nc2lmdA==");
        decode_base64_strings(&mut node);
        assert_eq!(node, Node::from("logsift"));
    }

    #[test]
    fn minimum_length_gate() {
        // Eight characters is the floor: "dGVzdA==" decodes, "YWI=" does not.
        let mut at_floor = Node::from("dGVzdA==");
        decode_base64_strings(&mut at_floor);
        assert_eq!(at_floor, Node::from("test"));

        let mut below_floor = Node::from("YWI=");
        decode_base64_strings(&mut below_floor);
        assert_eq!(below_floor, Node::from("YWI="));
    }

    #[test]
    fn non_utf8_payloads_are_left_alone() {
        // "//79/A==" decodes to 0xFF 0xFE 0xFD 0xFC, which is not UTF-8.
        let mut node = Node::from("//79/A==");
        decode_base64_strings(&mut node);
        assert_eq!(node, Node::from("//79/A=="));
    }

    #[test]
    fn unpadded_odd_length_is_left_alone() {
        let mut node = Node::from("not base64 at all");
        decode_base64_strings(&mut node);
        assert_eq!(node, Node::from("not base64 at all"));
    }

    #[test]
    fn recurses_into_nested_structures() {
        let mut obj = crate::node::Object::new();
        obj.insert("payload".to_string(), Node::from("SGVsbG8sIHdvcmxkISEh"));
        obj.insert(
            "inner".to_string(),
            Node::Array(vec![Node::from("bG9nc2lmdA==")]),
        );
        let mut node = Node::Object(obj);
        decode_base64_strings(&mut node);
        let obj = node.as_object().unwrap();
        assert_eq!(obj["payload"], Node::from("Hello, world!!!"));
        assert_eq!(obj["inner"], Node::Array(vec![Node::from("logsift")]));
    }
}
