//! Receipt extraction from recognized text.

mod assembler;
mod parser;
pub mod rules;

pub use assembler::assemble;
pub use parser::{
    decode_text, parse_raw_output, ExtractionResult, LayoutReceiptParser, ReceiptParser,
};

use std::fmt;

/// A recoverable condition met while extracting a receipt.
///
/// None of these abort extraction; they are logged and returned alongside
/// the receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A numeric token could not be parsed and was recorded as zero.
    NormalizationFailure { field: String, token: String },
    /// No tax triple was found; all tax fields are zero.
    NoTaxMatch,
    /// No item line was found; the placeholder item was inserted.
    NoItemMatch,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NormalizationFailure { field, token } => {
                write!(f, "cannot convert {:?} to a number for {}", token, field)
            }
            Diagnostic::NoTaxMatch => write!(f, "no tax fields found in raw output"),
            Diagnostic::NoItemMatch => write!(f, "no items detected in raw output"),
        }
    }
}
