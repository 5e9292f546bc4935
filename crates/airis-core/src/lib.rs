//! Core library for receipt recognition output.
//!
//! This crate provides:
//! - Numeric normalization of recognized tokens
//! - Positional tax field and line item extraction over declarative token layouts
//! - Receipt assembly with a placeholder item when nothing was recognized
//! - Flattening of receipts into a single row for tabular export
//! - The image-to-text recognition contract, with an optional ONNX backend

pub mod error;
pub mod export;
pub mod models;
pub mod receipt;
pub mod recognition;

pub use error::{AirisError, ExtractionError, RecognitionError, Result};
pub use export::{flatten, CellValue, FlatRow};
pub use models::config::AirisConfig;
pub use models::receipt::{ItemRow, LineItem, StructuredReceipt, TaxFields};
pub use receipt::rules::{normalize, Normalize, Normalized};
pub use receipt::{
    assemble, decode_text, parse_raw_output, Diagnostic, ExtractionResult, LayoutReceiptParser,
    ReceiptParser,
};
pub use recognition::{Recognizer, StaticRecognizer};

#[cfg(feature = "native")]
pub use recognition::OnnxRecognizer;
