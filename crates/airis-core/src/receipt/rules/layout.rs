//! Declarative token layouts.
//!
//! A [`TokenLayout`] is an ordered list of typed slots separated by
//! whitespace. It compiles to a single regex with one named group per slot,
//! so a layout can be read (and tested) as data instead of as a pattern
//! string.

use std::fmt;

use regex::{Captures, Regex};
use thiserror::Error;

/// The kind of token a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A run of digits.
    Digits,
    /// A run of digits and thousands separators.
    Amount,
    /// The shortest non-empty run of characters up to the next slot.
    Text,
}

impl SlotKind {
    fn pattern(self) -> &'static str {
        match self {
            SlotKind::Digits => r"\d+",
            SlotKind::Amount => r"[\d,]+",
            SlotKind::Text => r".+?",
        }
    }
}

/// One named, typed position in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSlot {
    pub name: &'static str,
    pub kind: SlotKind,
}

impl TokenSlot {
    pub const fn new(name: &'static str, kind: SlotKind) -> Self {
        Self { name, kind }
    }
}

/// Errors building a layout.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("layout has no slots")]
    Empty,

    #[error("invalid layout: {0}")]
    Regex(#[from] regex::Error),
}

/// An ordered sequence of token slots, compiled for matching.
#[derive(Debug, Clone)]
pub struct TokenLayout {
    slots: Vec<TokenSlot>,
    regex: Regex,
}

impl TokenLayout {
    /// Compile a layout. Slot names must be unique identifiers.
    pub fn new(slots: &[TokenSlot]) -> Result<Self, LayoutError> {
        if slots.is_empty() {
            return Err(LayoutError::Empty);
        }

        let pattern = slots
            .iter()
            .map(|slot| format!("(?P<{}>{})", slot.name, slot.kind.pattern()))
            .collect::<Vec<_>>()
            .join(r"\s+");

        Ok(Self {
            slots: slots.to_vec(),
            regex: Regex::new(&pattern)?,
        })
    }

    /// The slots in order.
    pub fn slots(&self) -> &[TokenSlot] {
        &self.slots
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// First match anywhere in `text`.
    pub fn find_first<'t>(&self, text: &'t str) -> Option<LayoutMatch<'t>> {
        self.regex
            .captures(text)
            .map(|captures| LayoutMatch { captures })
    }

    /// All non-overlapping matches, left to right.
    pub fn find_all<'a, 't>(&'a self, text: &'t str) -> impl Iterator<Item = LayoutMatch<'t>> + 'a
    where
        't: 'a,
    {
        self.regex
            .captures_iter(text)
            .map(|captures| LayoutMatch { captures })
    }
}

impl fmt::Display for TokenLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.slots.iter().map(|s| s.name.to_uppercase()).collect();
        write!(f, "{}", names.join(" "))
    }
}

/// One occurrence of a layout in text.
#[derive(Debug)]
pub struct LayoutMatch<'t> {
    captures: Captures<'t>,
}

impl<'t> LayoutMatch<'t> {
    /// The token captured by the named slot.
    pub fn get(&self, slot: &str) -> Option<&'t str> {
        self.captures.name(slot).map(|m| m.as_str())
    }

    /// The whole matched text.
    pub fn as_str(&self) -> &'t str {
        self.captures.get(0).map_or("", |m| m.as_str())
    }

    /// Byte range of the match in the source text.
    pub fn span(&self) -> (usize, usize) {
        self.captures.get(0).map_or((0, 0), |m| (m.start(), m.end()))
    }
}
