//! Field paths: the textual address of a node in a tree.
//!
//! # Syntax
//!
//! - A path starts with `.` and is split into components on unescaped `.`
//! - Each component is a key name optionally followed by subscripts:
//!   `name`, `name[3]`, `name[1][0]`
//! - Inside a name, `\.`, `\\`, `\[` and `\]` stand for the literal character
//! - Subscripts are non-negative decimal integers without leading zeros
//! - At most [`MAX_DEPTH`] components, counting each subscript
//!
//! ```
//! use stree_core::{FieldPath, Segment};
//!
//! let path = FieldPath::parse(".servers[1].host\\.name").unwrap();
//! assert_eq!(
//!     path.segments(),
//!     &[
//!         Segment::Key("servers".into()),
//!         Segment::Index(1),
//!         Segment::Key("host.name".into()),
//!     ]
//! );
//! assert_eq!(path.to_string(), ".servers[1].host\\.name");
//! ```

use crate::error::PathError;
use std::fmt;
use std::str::FromStr;

/// Most components a path may have. Each subscript counts as one.
pub const MAX_DEPTH: usize = 256;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Map lookup by key.
    Key(String),
    /// List lookup by position.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => {
                f.write_str(".")?;
                write_escaped(f, key)
            }
            Segment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A parsed field path. The empty path addresses the root and renders as `""`.
///
/// Two paths are equal exactly when their canonical texts are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse canonical path text.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        Parser::new(text).parse()
    }

    /// Parse path text, panicking on malformed input.
    ///
    /// For tests and startup code with literal paths only.
    pub fn must_parse(text: &str) -> Self {
        match Self::parse(text) {
            Ok(path) => path,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(Segment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(Segment::Index(index));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    /// A new path with `key` appended.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.push_key(key);
        next
    }

    /// A new path with a subscript appended.
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.push_index(index);
        next
    }

    /// The path made of the first `len` segments.
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// The last key segment, ignoring any trailing subscripts.
    pub fn last_key(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|seg| match seg {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Index(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.0 {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<Segment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    for c in key.chars() {
        if matches!(c, '.' | '\\' | '[' | ']') {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

/// Single-pass scanner over path text.
struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn parse(mut self) -> Result<FieldPath, PathError> {
        if self.bump() != Some('.') {
            return Err(PathError::MissingPrefix {
                path: self.text.to_string(),
            });
        }

        let mut segments = Vec::new();
        loop {
            let name = self.parse_name()?;
            segments.push(Segment::Key(name));

            while self.peek() == Some('[') {
                segments.push(Segment::Index(self.parse_subscript()?));
            }

            if segments.len() > MAX_DEPTH {
                return Err(PathError::TooDeep {
                    path: self.text.to_string(),
                    limit: MAX_DEPTH,
                });
            }

            match self.bump() {
                None => break,
                Some('.') => continue,
                Some(_) => {
                    // Text after a subscript that is neither `.` nor `[`.
                    return Err(PathError::BadSubscript {
                        path: self.text.to_string(),
                        subscript: self.text[self.last_subscript_start()..].to_string(),
                    });
                }
            }
        }

        Ok(FieldPath(segments))
    }

    fn parse_name(&mut self) -> Result<String, PathError> {
        let start = self.pos;
        let mut name = String::new();
        while let Some(c) = self.peek() {
            match c {
                '.' | '[' => break,
                ']' => {
                    return Err(PathError::BadSubscript {
                        path: self.text.to_string(),
                        subscript: "]".to_string(),
                    });
                }
                '\\' => {
                    let offset = self.pos;
                    self.bump();
                    match self.bump() {
                        Some(esc @ ('.' | '\\' | '[' | ']')) => name.push(esc),
                        _ => {
                            return Err(PathError::BadEscape {
                                path: self.text.to_string(),
                                offset,
                            })
                        }
                    }
                }
                _ => {
                    name.push(c);
                    self.bump();
                }
            }
        }
        if name.is_empty() {
            return Err(PathError::EmptyComponent {
                path: self.text.to_string(),
                offset: start,
            });
        }
        Ok(name)
    }

    fn parse_subscript(&mut self) -> Result<usize, PathError> {
        let open = self.pos;
        self.bump();
        let close = match self.text[self.pos..].find(']') {
            Some(rel) => self.pos + rel,
            None => {
                return Err(PathError::BadSubscript {
                    path: self.text.to_string(),
                    subscript: self.text[open..].to_string(),
                })
            }
        };
        let digits = &self.text[self.pos..close];
        let bad = || PathError::BadSubscript {
            path: self.text.to_string(),
            subscript: self.text[open..=close].to_string(),
        };
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
        {
            return Err(bad());
        }
        let index = digits.parse::<usize>().map_err(|_| bad())?;
        self.pos = close + 1;
        Ok(index)
    }

    /// Byte offset of the `[` that opened the most recent subscript.
    fn last_subscript_start(&self) -> usize {
        self.text[..self.pos].rfind('[').unwrap_or(0)
    }
}
