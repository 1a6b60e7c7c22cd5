//! Scanner for the brace-delimited protobuf-style text grammar.
//!
//! Produces [`Spanned`] tokens lazily from a text span, skipping whitespace.
//! The scanner is restartable: construct it at any byte offset of the source
//! and iterate. Lexical problems surface as `Err` items carrying the byte
//! offset where the bad token started.

use crate::error::{ParseError, Result};

/// A lexical unit of the source grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare identifier: a key name, `[A-Za-z_][A-Za-z0-9_]*`.
    Ident(String),
    /// Quoted string with escapes already resolved.
    Str(String),
    /// Numeric literal, kept raw; coercion types it later.
    Number(String),
    /// Exact `true` / `false`.
    Bool(bool),
    LBrace,
    RBrace,
    Colon,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Str(_) => "string literal".to_string(),
            Token::Number(raw) => format!("number '{raw}'"),
            Token::Bool(b) => format!("'{b}'"),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::Colon => "':'".to_string(),
        }
    }
}

/// A token plus the byte offset where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::starting_at(src, 0)
    }

    /// Start scanning at `offset` (a byte index into `src`). Offsets reported
    /// in tokens and errors stay relative to the full `src`.
    pub fn starting_at(src: &'a str, offset: usize) -> Self {
        Self { src, pos: offset.min(src.len()) }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t' | b'\n' | b'\r') {
            self.pos += 1;
        }
    }

    /// Scan the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned>> {
        self.skip_whitespace();
        let bytes = self.bytes();
        if self.pos >= bytes.len() {
            return Ok(None);
        }

        let start = self.pos;
        let token = match bytes[start] {
            b'{' => {
                self.pos += 1;
                Token::LBrace
            }
            b'}' => {
                self.pos += 1;
                Token::RBrace
            }
            b':' => {
                self.pos += 1;
                Token::Colon
            }
            b'"' => self.scan_string(start)?,
            b'-' | b'0'..=b'9' => self.scan_number(start)?,
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.scan_identifier(start),
            other => {
                return Err(ParseError::Lexical {
                    offset: start,
                    message: format!("unexpected character '{}'", other as char),
                });
            }
        };

        Ok(Some(Spanned { token, offset: start }))
    }

    fn scan_string(&mut self, start: usize) -> Result<Token> {
        let bytes = self.bytes();
        self.pos += 1; // opening quote
        let mut value = String::new();

        loop {
            if self.pos >= bytes.len() {
                return Err(ParseError::Lexical {
                    offset: start,
                    message: "unterminated string literal".to_string(),
                });
            }
            match bytes[self.pos] {
                b'"' => {
                    self.pos += 1;
                    return Ok(Token::Str(value));
                }
                b'\n' | b'\r' => {
                    return Err(ParseError::Lexical {
                        offset: start,
                        message: "newline inside string literal".to_string(),
                    });
                }
                b'\\' => {
                    self.pos += 1;
                    if self.pos >= bytes.len() {
                        return Err(ParseError::Lexical {
                            offset: start,
                            message: "unterminated string literal".to_string(),
                        });
                    }
                    match bytes[self.pos] {
                        b'"' => value.push('"'),
                        b'\\' => value.push('\\'),
                        b'n' => value.push('\n'),
                        b't' => value.push('\t'),
                        b'r' => value.push('\r'),
                        _ => {
                            // Unknown escape: keep the escaped character verbatim.
                            let ch = self.src[self.pos..]
                                .chars()
                                .next()
                                .unwrap_or('\u{FFFD}');
                            value.push(ch);
                            self.pos += ch.len_utf8();
                            continue;
                        }
                    }
                    self.pos += 1;
                }
                _ => {
                    // Copy a maximal run of plain bytes in one slice.
                    let run_start = self.pos;
                    while self.pos < bytes.len()
                        && !matches!(bytes[self.pos], b'"' | b'\\' | b'\n' | b'\r')
                    {
                        self.pos += 1;
                    }
                    value.push_str(&self.src[run_start..self.pos]);
                }
            }
        }
    }

    /// JSON number grammar: `-? int frac? exp?`.
    fn scan_number(&mut self, start: usize) -> Result<Token> {
        let bytes = self.bytes();

        if bytes[self.pos] == b'-' {
            self.pos += 1;
        }
        if !self.eat_digits() {
            return Err(ParseError::Lexical {
                offset: start,
                message: "malformed number: expected digits".to_string(),
            });
        }
        if self.pos < bytes.len() && bytes[self.pos] == b'.' {
            self.pos += 1;
            if !self.eat_digits() {
                return Err(ParseError::Lexical {
                    offset: start,
                    message: "malformed number: expected digits after '.'".to_string(),
                });
            }
        }
        if self.pos < bytes.len() && matches!(bytes[self.pos], b'e' | b'E') {
            self.pos += 1;
            if self.pos < bytes.len() && matches!(bytes[self.pos], b'+' | b'-') {
                self.pos += 1;
            }
            if !self.eat_digits() {
                return Err(ParseError::Lexical {
                    offset: start,
                    message: "malformed number: expected exponent digits".to_string(),
                });
            }
        }

        Ok(Token::Number(self.src[start..self.pos].to_string()))
    }

    fn eat_digits(&mut self) -> bool {
        let bytes = self.bytes();
        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        self.pos > start
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        let bytes = self.bytes();
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
        match &self.src[start..self.pos] {
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            name => Token::Ident(name.to_string()),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Spanned>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
