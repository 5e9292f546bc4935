//! Numeric token normalization.
//!
//! Tokens come out of the recognizer with thousands separators (`4,500`).
//! Normalization never fails: a token that does not parse yields
//! [`Normalized::Defaulted`], whose value is zero.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::warn;

use crate::receipt::Diagnostic;

/// Thousands separator stripped before parsing.
pub const THOUSANDS_SEPARATOR: char = ',';

lazy_static! {
    /// A single Unicode decimal digit, as `\d` matches it in token layouts.
    static ref DECIMAL_DIGIT: Regex = Regex::new(r"^\d$").unwrap();

    /// A plain or scientific decimal number in ASCII digits.
    static ref NUMBER_SHAPE: Regex =
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap();
}

/// Why a value fell back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    /// No token at all.
    Absent,
    /// Nothing left after stripping separators and whitespace.
    Empty,
    /// The token is not a decimal number.
    NotNumeric,
    /// NaN or infinite input.
    NonFinite,
    /// A well-formed number outside the range of `Decimal`.
    OutOfRange,
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::Absent => write!(f, "absent"),
            DefaultReason::Empty => write!(f, "empty"),
            DefaultReason::NotNumeric => write!(f, "not numeric"),
            DefaultReason::NonFinite => write!(f, "not finite"),
            DefaultReason::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// Outcome of normalizing one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The token parsed to this value.
    Parsed(Decimal),
    /// The token could not be used; the value is zero.
    Defaulted { token: String, reason: DefaultReason },
}

impl Normalized {
    fn defaulted(token: impl Into<String>, reason: DefaultReason) -> Self {
        Normalized::Defaulted {
            token: token.into(),
            reason,
        }
    }

    /// The numeric value, zero when defaulted.
    pub fn value(&self) -> Decimal {
        match self {
            Normalized::Parsed(v) => *v,
            Normalized::Defaulted { .. } => Decimal::ZERO,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Normalized::Parsed(_))
    }
}

/// Values that can be normalized to a decimal.
pub trait Normalize {
    fn normalize(&self) -> Normalized;
}

impl Normalize for str {
    fn normalize(&self) -> Normalized {
        let cleaned: String = self
            .chars()
            .filter(|&c| c != THOUSANDS_SEPARATOR)
            .map(|c| ascii_digit(c).unwrap_or(c))
            .collect();
        let cleaned = cleaned.trim();

        if cleaned.is_empty() {
            return Normalized::defaulted(self, DefaultReason::Empty);
        }

        match Decimal::from_str(cleaned).or_else(|_| Decimal::from_scientific(cleaned)) {
            Ok(value) => Normalized::Parsed(value),
            Err(_) if NUMBER_SHAPE.is_match(cleaned) => {
                Normalized::defaulted(self, DefaultReason::OutOfRange)
            }
            Err(_) => Normalized::defaulted(self, DefaultReason::NotNumeric),
        }
    }
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// The ASCII digit for any Unicode decimal digit (Arabic-Indic, fullwidth, ...).
///
/// Decimal digits are encoded in contiguous runs of ten, zero first, so a
/// digit's value is its distance from the start of its run, modulo ten.
fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    if c.is_ascii() || !is_decimal_digit(c) {
        return None;
    }

    let preceding = (1u32..)
        .map_while(|offset| char::from_u32(u32::from(c).checked_sub(offset)?))
        .take_while(|&p| is_decimal_digit(p))
        .count();

    char::from_digit((preceding % 10) as u32, 10)
}

impl Normalize for String {
    fn normalize(&self) -> Normalized {
        self.as_str().normalize()
    }
}

impl Normalize for Decimal {
    fn normalize(&self) -> Normalized {
        Normalized::Parsed(*self)
    }
}

impl Normalize for f64 {
    fn normalize(&self) -> Normalized {
        if !self.is_finite() {
            return Normalized::defaulted(self.to_string(), DefaultReason::NonFinite);
        }
        Decimal::from_f64(*self)
            .map(Normalized::Parsed)
            .unwrap_or_else(|| Normalized::defaulted(self.to_string(), DefaultReason::OutOfRange))
    }
}

impl Normalize for i64 {
    fn normalize(&self) -> Normalized {
        Normalized::Parsed(Decimal::from(*self))
    }
}

impl Normalize for u32 {
    fn normalize(&self) -> Normalized {
        Normalized::Parsed(Decimal::from(*self))
    }
}

impl<T: Normalize + ?Sized> Normalize for &T {
    fn normalize(&self) -> Normalized {
        (**self).normalize()
    }
}

impl<T: Normalize> Normalize for Option<T> {
    fn normalize(&self) -> Normalized {
        match self {
            Some(value) => value.normalize(),
            None => Normalized::defaulted("", DefaultReason::Absent),
        }
    }
}

/// Normalize any supported value.
pub fn normalize<T: Normalize + ?Sized>(value: &T) -> Normalized {
    value.normalize()
}

/// Normalize the token of a named field, logging and recording a diagnostic
/// when it falls back to zero.
pub fn normalize_field<T: Normalize + ?Sized>(
    field: &str,
    value: &T,
    diagnostics: &mut Vec<Diagnostic>,
) -> Decimal {
    let normalized = value.normalize();

    if let Normalized::Defaulted { token, reason } = &normalized {
        warn!("Cannot convert {:?} to a number for {} ({})", token, field, reason);
        diagnostics.push(Diagnostic::NormalizationFailure {
            field: field.to_string(),
            token: token.clone(),
        });
    }

    normalized.value()
}
