//! Placeholder tokenizer and renumbering.
//!
//! Clause templates use `?` as a generic parameter marker. [`Tokens`] splits a
//! template into raw text and markers; [`Renumberer`] rewrites the markers into
//! the target style while sharing one counter across every clause of a
//! statement.
//!
//! By default the scan is literal-aware: a `?` inside a single-quoted string
//! (`'...'`, with `''` escapes), an escape string (`E'...'`, which also takes
//! backslash escapes) or a double-quoted identifier (`"..."`) is raw text. An
//! unterminated quote swallows the rest of the template.

use serde::Deserialize;
use std::fmt::Write;

/// How positional parameters are written in rendered SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `$1, $2, ...` (PostgreSQL)
    #[default]
    Dollar,
    /// `?` kept as-is; the argument order still follows the markers.
    Question,
}

/// A piece of a clause template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Escape,
    Double,
}

impl Quote {
    fn closing(self) -> u8 {
        match self {
            Quote::Single | Quote::Escape => b'\'',
            Quote::Double => b'"',
        }
    }
}

/// Iterator over the [`Token`]s of a template.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    src: &'a str,
    pos: usize,
    literal_aware: bool,
    quote: Option<Quote>,
}

impl<'a> Tokens<'a> {
    pub fn new(src: &'a str, literal_aware: bool) -> Self {
        Self {
            src,
            pos: 0,
            literal_aware,
            quote: None,
        }
    }

    /// Quote opened by the byte at `pos`, if any.
    fn opening_quote(&self, bytes: &[u8]) -> Option<Quote> {
        match bytes[self.pos] {
            b'"' => Some(Quote::Double),
            b'\'' if self.has_escape_prefix(bytes) => Some(Quote::Escape),
            b'\'' => Some(Quote::Single),
            _ => None,
        }
    }

    /// `E'` / `e'` where the `E` is not the tail of a longer identifier.
    fn has_escape_prefix(&self, bytes: &[u8]) -> bool {
        if self.pos == 0 || !matches!(bytes[self.pos - 1], b'E' | b'e') {
            return false;
        }
        self.pos < 2 || !is_ident_byte(bytes[self.pos - 2])
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || !b.is_ascii()
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.src.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }
        if self.quote.is_none() && bytes[self.pos] == b'?' {
            self.pos += 1;
            return Some(Token::Marker);
        }

        let start = self.pos;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            match self.quote {
                None if b == b'?' => break,
                None if self.literal_aware => self.quote = self.opening_quote(bytes),
                // Skip the escaped byte so `\'` does not close the literal.
                Some(Quote::Escape) if b == b'\\' => self.pos += 1,
                Some(q) if b == q.closing() => {
                    // A doubled quote is an escaped quote.
                    if bytes.get(self.pos + 1) == Some(&b) {
                        self.pos += 1;
                    } else {
                        self.quote = None;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(bytes.len());
        // Only ASCII bytes stop the scan, so both ends are char boundaries.
        Some(Token::Text(&self.src[start..self.pos]))
    }
}

/// Count the markers in a template.
pub fn count_markers(template: &str, literal_aware: bool) -> usize {
    Tokens::new(template, literal_aware)
        .filter(|t| matches!(t, Token::Marker))
        .count()
}

/// Rewrites markers across the clauses of one statement.
#[derive(Debug, Clone)]
pub struct Renumberer {
    next: usize,
    style: PlaceholderStyle,
    literal_aware: bool,
}

impl Renumberer {
    /// Start numbering at `$1`.
    pub fn new(style: PlaceholderStyle, literal_aware: bool) -> Self {
        Self {
            next: 1,
            style,
            literal_aware,
        }
    }

    /// The index the next marker will receive.
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Append one positional parameter without a template (e.g. INSERT values).
    pub fn push_param(&mut self, out: &mut String) {
        match self.style {
            PlaceholderStyle::Dollar => {
                let _ = write!(out, "${}", self.next);
            }
            PlaceholderStyle::Question => out.push('?'),
        }
        self.next += 1;
    }

    /// Append `template` to `out` with its markers renumbered. Returns the
    /// number of markers consumed.
    pub fn write(&mut self, template: &str, out: &mut String) -> usize {
        let mut consumed = 0;
        for token in Tokens::new(template, self.literal_aware) {
            match token {
                Token::Text(s) => out.push_str(s),
                Token::Marker => {
                    self.push_param(out);
                    consumed += 1;
                }
            }
        }
        consumed
    }
}

/// Renumber a single template starting at `$1`.
pub fn renumber(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 4);
    Renumberer::new(PlaceholderStyle::Dollar, true).write(template, &mut out);
    out
}
