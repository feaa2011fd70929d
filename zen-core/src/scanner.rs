//! Forward-only character cursor
//!
//! Every tokenizer in the crate (abbreviation grammar, attribute sets, tabstop
//! scanning, counters, comment templates) is built on top of [`Scanner`].
//! Positions are byte offsets into the scanned string; [`Scanner::char_position`]
//! converts the cursor into a character index for error reporting.
//!
//! Lookup failures never panic or error: `skip_to_pair`, `skip_to` and the
//! `match_*` family return `false`/`None` and leave the cursor untouched.

use regex::{Captures, Regex};

/// Something a single character can be tested against
pub trait Matcher {
    fn matches(&self, ch: char) -> bool;
}

impl Matcher for char {
    fn matches(&self, ch: char) -> bool {
        *self == ch
    }
}

impl<F> Matcher for F
where
    F: Fn(char) -> bool,
{
    fn matches(&self, ch: char) -> bool {
        self(ch)
    }
}

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    string: &'a str,
    /// Current cursor position
    pub pos: usize,
    /// Start of the token being scanned, see [`Scanner::current`]
    pub start: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(string: &'a str) -> Self {
        Scanner {
            string,
            pos: 0,
            start: 0,
        }
    }

    /// The whole scanned string
    pub fn source(&self) -> &'a str {
        self.string
    }

    pub fn eol(&self) -> bool {
        self.pos >= self.string.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.string[self.pos..].chars().next()
    }

    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume the next character if it satisfies `matcher`
    pub fn eat(&mut self, matcher: impl Matcher) -> Option<char> {
        match self.peek() {
            Some(ch) if matcher.matches(ch) => {
                self.pos += ch.len_utf8();
                Some(ch)
            }
            _ => None,
        }
    }

    /// Consume characters while `matcher` holds. Returns `true` if anything was consumed.
    pub fn eat_while(&mut self, matcher: impl Matcher) -> bool {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !matcher.matches(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.pos > start
    }

    pub fn eat_space(&mut self) -> bool {
        self.eat_while(char::is_whitespace)
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.string.len();
    }

    /// Move the cursor onto the next occurrence of `ch`
    pub fn skip_to(&mut self, ch: char) -> bool {
        match self.string[self.pos..].find(ch) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => false,
        }
    }

    /// Skip a balanced `open`..`close` run starting at the cursor, leaving the
    /// cursor right after the matching `close`.
    ///
    /// With `skip_quoted`, single and double quoted strings (honouring backslash
    /// escapes) are stepped over so delimiters inside them do not count.
    pub fn skip_to_pair(&mut self, open: char, close: char, skip_quoted: bool) -> bool {
        let mut depth = 0usize;
        let mut chars = self.string[self.pos..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            if skip_quoted && (ch == '"' || ch == '\'') {
                let mut closed = false;
                while let Some((_, inner)) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == ch {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return false;
                }
            } else if ch == open {
                depth += 1;
            } else if ch == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.pos += offset + ch.len_utf8();
                    return true;
                }
            }
        }
        false
    }

    /// Step back `n` characters
    pub fn back_up(&mut self, n: usize) {
        for _ in 0..n {
            match self.string[..self.pos].chars().next_back() {
                Some(ch) => self.pos -= ch.len_utf8(),
                None => break,
            }
        }
    }

    /// Text between the last `start` mark and the cursor
    pub fn current(&self) -> &'a str {
        &self.string[self.start.min(self.pos)..self.pos]
    }

    /// Everything after the cursor
    pub fn rest(&self) -> &'a str {
        &self.string[self.pos..]
    }

    /// Set the token start to the cursor
    pub fn mark(&mut self) {
        self.start = self.pos;
    }

    /// Test whether the rest of the string starts with `pattern`
    pub fn match_str(&mut self, pattern: &str, consume: bool, case_insensitive: bool) -> bool {
        let rest = self.rest();
        let matched = if case_insensitive {
            rest.len() >= pattern.len()
                && rest.is_char_boundary(pattern.len())
                && rest[..pattern.len()].eq_ignore_ascii_case(pattern)
        } else {
            rest.starts_with(pattern)
        };
        if matched && consume {
            self.pos += pattern.len();
        }
        matched
    }

    /// Match an anchored (`^...`) regex against the rest of the string
    pub fn match_regex(&mut self, pattern: &Regex, consume: bool) -> Option<Captures<'a>> {
        let rest: &'a str = &self.string[self.pos..];
        let captures = pattern.captures(rest)?;
        let whole = captures.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        if consume {
            self.pos += whole.end();
        }
        Some(captures)
    }

    /// Cursor as a character index
    pub fn char_position(&self) -> usize {
        char_index(self.string, self.pos)
    }
}

/// Convert a byte offset into a character index
pub fn char_index(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset.min(text.len())].chars().count()
}
