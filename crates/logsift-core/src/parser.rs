//! Recursive-descent parser for the protobuf-style text grammar.
//!
//! Consumes the token stream and builds one [`Object`] per logical entry.
//! Nested braces become nested objects; a key repeated at the same nesting
//! level promotes the existing value to an array and appends, preserving
//! order of appearance. Nesting is bounded by a configurable max depth.
//!
//! Entries exported from log platforms often carry a prose prefix
//! ("Received SomeEventType event id:...") before the first real field;
//! [`field_start_offset`] locates where the structured data begins so the
//! tokenizer can skip the prose.

use crate::coerce;
use crate::error::{ParseError, Result};
use crate::node::{Node, Object};
use crate::tokenizer::{Spanned, Token, Tokenizer};
use once_cell::sync::Lazy;
use regex::Regex;

/// A field name followed by something that can start a value. This is what
/// distinguishes real structured data from prose like "metadata:" labels.
static FIELD_WITH_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b[A-Za-z_][A-Za-z0-9_]*:\s*["{0-9-]"#).expect("static regex"));

/// Fallback: any `ident:` at all.
static ANY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*:").expect("static regex"));

/// Byte offset where the structured portion of `text` begins, or `None` when
/// the text contains nothing that looks like a field.
pub fn field_start_offset(text: &str) -> Option<usize> {
    FIELD_WITH_VALUE
        .find(text)
        .or_else(|| ANY_FIELD.find(text))
        .map(|m| m.start())
}

/// Parse one logical entry into an ordered object.
///
/// Prose before the first field is skipped. Text with no field at all yields
/// an empty object; the pipeline decides what to do with that (plain-text
/// fallback). Lexical and structural problems propagate as errors.
pub fn parse_text(src: &str, max_depth: usize) -> Result<Object> {
    let start = match field_start_offset(src) {
        Some(offset) => offset,
        None => return Ok(Object::new()),
    };
    let mut parser = Parser {
        tokens: Tokenizer::starting_at(src, start),
        peeked: None,
        last_offset: start,
        max_depth,
    };
    parser.parse_top()
}

struct Parser<'a> {
    tokens: Tokenizer<'a>,
    peeked: Option<Spanned>,
    last_offset: usize,
    max_depth: usize,
}

impl Parser<'_> {
    fn next(&mut self) -> Result<Option<Spanned>> {
        if let Some(spanned) = self.peeked.take() {
            self.last_offset = spanned.offset;
            return Ok(Some(spanned));
        }
        let next = self.tokens.next_token()?;
        if let Some(spanned) = &next {
            self.last_offset = spanned.offset;
        }
        Ok(next)
    }

    fn peek(&mut self) -> Result<Option<&Spanned>> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn structure(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::Structure { offset, message: message.into() }
    }

    fn parse_top(&mut self) -> Result<Object> {
        let mut object = Object::new();
        while let Some(spanned) = self.next()? {
            let key = self.key_name(spanned)?;
            self.expect_colon(&key)?;
            let value = self.parse_value(0)?;
            insert_field(&mut object, key, value);
        }
        Ok(object)
    }

    /// Parse a `{ ... }` body; the opening brace is already consumed.
    fn parse_object(&mut self, depth: usize) -> Result<Object> {
        let mut object = Object::new();
        loop {
            let spanned = self
                .next()?
                .ok_or_else(|| self.structure(self.last_offset, "missing closing '}'"))?;
            if spanned.token == Token::RBrace {
                return Ok(object);
            }
            let key = self.key_name(spanned)?;
            self.expect_colon(&key)?;
            let value = self.parse_value(depth)?;
            insert_field(&mut object, key, value);
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Node> {
        let spanned = self
            .next()?
            .ok_or_else(|| self.structure(self.last_offset, "expected a value"))?;
        match spanned.token {
            Token::LBrace => {
                if depth + 1 > self.max_depth {
                    return Err(self.structure(
                        spanned.offset,
                        format!("maximum nesting depth {} exceeded", self.max_depth),
                    ));
                }
                Ok(Node::Object(self.parse_object(depth + 1)?))
            }
            Token::Str(s) => Ok(Node::String(s)),
            Token::Number(raw) => Ok(coerce::number(&raw)),
            Token::Bool(b) => Ok(Node::Bool(b)),
            other => Err(self.structure(
                spanned.offset,
                format!("expected a value, found {}", other.describe()),
            )),
        }
    }

    /// A field name: an identifier, or a bare `true`/`false` used as a key.
    fn key_name(&self, spanned: Spanned) -> Result<String> {
        match spanned.token {
            Token::Ident(name) => Ok(name),
            Token::Bool(b) => Ok(b.to_string()),
            Token::RBrace => Err(self.structure(spanned.offset, "unmatched '}'")),
            other => Err(self.structure(
                spanned.offset,
                format!("expected a field name, found {}", other.describe()),
            )),
        }
    }

    fn expect_colon(&mut self, key: &str) -> Result<()> {
        match self.next()? {
            Some(Spanned { token: Token::Colon, .. }) => Ok(()),
            Some(spanned) => Err(self.structure(
                spanned.offset,
                format!(
                    "expected ':' after field name '{key}', found {}",
                    spanned.token.describe()
                ),
            )),
            None => Err(self.structure(
                self.last_offset,
                format!("expected ':' after field name '{key}'"),
            )),
        }
    }
}

/// Insert respecting the repeated-key rule: a second occurrence converts the
/// existing value to an array and appends; later occurrences keep appending.
fn insert_field(object: &mut Object, key: String, value: Node) {
    match object.get_mut(&key) {
        None => {
            object.insert(key, value);
        }
        Some(Node::Array(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Node::Null);
            *existing = Node::Array(vec![first, value]);
        }
    }
}
