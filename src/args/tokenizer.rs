//! Tokenizer: scans raw command text one fragment at a time.
//!
//! The scanner holds only a byte offset into the input. The binder drives it
//! token by token so it can rewind over undeclared flags and cut over to a
//! raw remainder capture at any point.

const QUOTE: char = '"';
const ESCAPE: char = '\\';
const FLAG_MARKER: char = '-';

/// A scanned value: the literal text after quote and escape removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueToken {
    pub text: String,
    pub quoted: bool,
}

/// One lexical fragment, as produced by the [`Iterator`] impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    Flag(&'a str),
    Value(ValueToken),
}

#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset. Pass to [`seek`](Self::seek) to backtrack.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        debug_assert!(self.input.is_char_boundary(pos));
        self.pos = pos;
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    /// True once only whitespace remains.
    pub fn is_exhausted(&self) -> bool {
        self.rest().trim_start().is_empty()
    }

    fn at_token_boundary(&self) -> bool {
        self.input[..self.pos]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace)
    }

    /// Consume a flag marker at the current position and return its name.
    ///
    /// A marker is `-` at the start of input or right after whitespace; the
    /// name runs until whitespace or `=`, and one trailing `=` or whitespace
    /// character is consumed. A `-` with an empty name is not a marker.
    /// Leaves the position untouched when no marker is present.
    pub fn next_flag(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        if self.peek() != Some(FLAG_MARKER) || !self.at_token_boundary() {
            return None;
        }

        let after_marker = self.pos + FLAG_MARKER.len_utf8();
        let tail = &self.input[after_marker..];
        let name_len = tail
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(tail.len());
        if name_len == 0 {
            return None;
        }
        let name = &tail[..name_len];
        self.pos = after_marker + name_len;

        if let Some(sep) = self.peek() {
            if sep == '=' || sep.is_whitespace() {
                self.pos += sep.len_utf8();
            }
        }
        Some(name)
    }

    /// True when the last flag was closed by `=` rather than whitespace.
    pub fn after_equals(&self) -> bool {
        self.input[..self.pos].ends_with('=')
    }

    /// Scan the next quoted or bare value, skipping leading whitespace.
    pub fn next_value(&mut self) -> Option<ValueToken> {
        self.skip_whitespace();
        match self.peek()? {
            QUOTE => Some(self.scan_quoted()),
            _ => Some(self.scan_bare()),
        }
    }

    fn scan_quoted(&mut self) -> ValueToken {
        let body_start = self.pos + QUOTE.len_utf8();
        let mut text = String::new();
        let mut chars = self.input[body_start..].char_indices();
        let mut end = self.input.len();

        while let Some((offset, c)) = chars.next() {
            match c {
                QUOTE => {
                    end = body_start + offset + QUOTE.len_utf8();
                    break;
                }
                // A trailing escape with nothing after it stays literal.
                ESCAPE => match chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => text.push(ESCAPE),
                },
                _ => text.push(c),
            }
        }

        self.pos = end;
        ValueToken { text, quoted: true }
    }

    fn scan_bare(&mut self) -> ValueToken {
        let rest = self.rest();
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += len;
        ValueToken {
            text: rest[..len].to_string(),
            quoted: false,
        }
    }

    /// Take everything left, trimmed, and move to end of input.
    pub fn take_remainder(&mut self) -> Option<&'a str> {
        let remainder = self.rest().trim();
        self.pos = self.input.len();
        (!remainder.is_empty()).then_some(remainder)
    }
}

/// Schema-less scan: every marker is reported as a flag.
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.next_flag() {
            return Some(Fragment::Flag(name));
        }
        self.next_value().map(Fragment::Value)
    }
}
