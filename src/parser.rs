// src/parser.rs
//
// Character scanner for the template front end.

use crate::errors::{Error, Result};

pub(crate) struct Scanner<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Function names: `[A-Za-z0-9_]+`.
    pub fn parse_identifier(&mut self) -> Result<String> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_ascii_alphanumeric() {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(Error::Parse("identifier expected".into()));
        }
        Ok(self.s[start..self.i].to_string())
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    /// Advance past one char and return it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.i += c.len_utf8();
        Some(c)
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn consume_str(&mut self, lit: &str) -> bool {
        if self.peek_str(lit) {
            self.i += lit.len();
            true
        } else {
            false
        }
    }

    pub fn expect_str(&mut self, lit: &str) -> Result<()> {
        if self.consume_str(lit) {
            Ok(())
        } else {
            Err(Error::Parse(format!("expected '{lit}'")))
        }
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}
