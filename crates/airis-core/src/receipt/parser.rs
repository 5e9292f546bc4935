//! Layout-driven receipt parser.

use std::time::Instant;

use image::DynamicImage;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result};
use crate::models::receipt::StructuredReceipt;
use crate::recognition::Recognizer;

use super::Diagnostic;
use super::assembler::assemble;
use super::rules::{extract_items, extract_taxes};

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted receipt.
    pub receipt: StructuredReceipt,
    /// Raw recognized text.
    pub raw_text: String,
    /// Recoverable conditions met during extraction.
    pub diagnostics: Vec<Diagnostic>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Diagnostics as human-readable warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse a receipt from recognized text. Never fails: unusable text
    /// produces a receipt full of defaults.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Parse possibly absent text. Absent text is the one hard failure.
    fn parse_input(&self, input: Option<&str>) -> Result<ExtractionResult> {
        match input {
            Some(text) => Ok(self.parse(text)),
            None => Err(ExtractionError::MalformedInput("no raw text supplied".to_string()).into()),
        }
    }

    /// Parse raw bytes, which must be UTF-8 text.
    fn parse_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        Ok(self.parse(decode_text(bytes)?))
    }

    /// Run the recognizer on an image and parse its output.
    fn recognize_and_parse(
        &self,
        recognizer: &dyn Recognizer,
        image: &DynamicImage,
    ) -> Result<ExtractionResult> {
        let text = recognizer.recognize(image)?;
        Ok(self.parse(&text))
    }
}

/// Parser matching the fixed tax and item token layouts.
#[derive(Debug, Clone, Default)]
pub struct LayoutReceiptParser {
    /// Discount recorded on every parsed receipt.
    discount: Decimal,
}

impl LayoutReceiptParser {
    /// Create a new parser with zero discount.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the discount recorded on parsed receipts.
    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }
}

impl ReceiptParser for LayoutReceiptParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut diagnostics = Vec::new();

        info!("Parsing receipt from {} characters of text", text.len());

        let taxes = extract_taxes(text, &mut diagnostics);

        let items = extract_items(text, &mut diagnostics);
        if items.is_empty() {
            warn!("No items detected in raw output");
            diagnostics.push(Diagnostic::NoItemMatch);
        }

        let receipt = assemble(taxes, self.discount, items);

        debug!(
            "Extracted receipt with {} items and {} diagnostics",
            receipt.items().len(),
            diagnostics.len()
        );

        ExtractionResult {
            receipt,
            raw_text: text.to_string(),
            diagnostics,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Decode raw recognition output, which must be UTF-8 text.
pub fn decode_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| {
        ExtractionError::MalformedInput(format!("raw text is not valid UTF-8: {}", e)).into()
    })
}

/// Parse raw recognition output with the default parser.
pub fn parse_raw_output(input: Option<&str>) -> Result<ExtractionResult> {
    LayoutReceiptParser::new().parse_input(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AirisError;
    use crate::models::receipt::{LineItem, TaxFields};
    use crate::recognition::StaticRecognizer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_taxes_without_items() {
        let result = parse_raw_output(Some("1,200 100 50")).unwrap();
        let receipt = &result.receipt;

        assert_eq!(receipt.tax_price(), Decimal::new(1200, 0));
        assert_eq!(receipt.service_tax(), Decimal::new(100, 0));
        assert_eq!(receipt.other_tax(), Decimal::new(50, 0));
        assert_eq!(receipt.items(), &[LineItem::sentinel()]);
        assert_eq!(result.diagnostics, vec![Diagnostic::NoItemMatch]);
    }

    #[test]
    fn test_single_item_line() {
        let result = parse_raw_output(Some("<s_menu> 1 2 3 4,500 6 7 8 9 Coffee 10 </s>")).unwrap();

        assert_eq!(
            result.receipt.items(),
            &[LineItem {
                unit_price: Decimal::new(4500, 0),
                sub_unit_price: Decimal::new(6, 0),
                sub_qty: Decimal::new(7, 0),
                sub_description: "8".to_string(),
                qty: Decimal::new(9, 0),
                disc_item: Decimal::new(10, 0),
                description: "Coffee".to_string(),
            }]
        );
        // The item line also holds the first numeric triple.
        assert_eq!(result.receipt.tax_price(), Decimal::new(1, 0));
        assert_eq!(result.receipt.service_tax(), Decimal::new(2, 0));
        assert_eq!(result.receipt.other_tax(), Decimal::new(3, 0));
    }

    #[test]
    fn test_empty_text_is_valid() {
        let result = parse_raw_output(Some("")).unwrap();

        assert_eq!(result.receipt.taxes(), TaxFields::default());
        assert!(result.receipt.discount().is_zero());
        assert!(result.receipt.has_no_items());
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NoTaxMatch, Diagnostic::NoItemMatch]
        );
    }

    #[test]
    fn test_absent_text_is_malformed() {
        let err = parse_raw_output(None).unwrap_err();
        assert!(matches!(
            err,
            AirisError::Extraction(ExtractionError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let parser = LayoutReceiptParser::new();
        assert!(parser.parse_bytes(&[0xff, 0xfe, 0x31]).is_err());

        let result = parser.parse_bytes(b"1,200 100 50").unwrap();
        assert_eq!(result.receipt.tax_price(), Decimal::new(1200, 0));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "7 8 9\n1 1 1 12,000 0 0 0 1 Cheesecake 0\n1 2 3 4,500 6 7 8 9 Coffee 10";
        let parser = LayoutReceiptParser::new();

        let first = parser.parse(text);
        let second = parser.parse(text);
        assert_eq!(first.receipt, second.receipt);
        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.receipt.items().len(), 2);
    }

    #[test]
    fn test_discount_is_copied() {
        let parser = LayoutReceiptParser::new().with_discount(Decimal::new(250, 0));
        let result = parser.parse("1,200 100 50");
        assert_eq!(result.receipt.discount(), Decimal::new(250, 0));
    }

    #[test]
    fn test_recognize_and_parse() {
        let recognizer = StaticRecognizer::new("1 2 3 4,500 6 7 8 9 Coffee 10");
        let image = DynamicImage::new_rgb8(4, 4);

        let result = LayoutReceiptParser::new()
            .recognize_and_parse(&recognizer, &image)
            .unwrap();
        assert_eq!(result.raw_text, "1 2 3 4,500 6 7 8 9 Coffee 10");
        assert_eq!(result.receipt.items()[0].description, "Coffee");
    }

    #[test]
    fn test_warnings_are_readable() {
        let result = parse_raw_output(Some("nothing here")).unwrap();
        assert_eq!(
            result.warnings(),
            vec![
                "no tax fields found in raw output".to_string(),
                "no items detected in raw output".to_string(),
            ]
        );
    }

    #[test]
    fn test_largest_tax_tokens_total_without_overflow() {
        let max = "79228162514264337593543950335";
        let result = parse_raw_output(Some(&format!("{max} {max} {max}"))).unwrap();

        assert_eq!(result.receipt.tax_price(), Decimal::MAX);
        assert_eq!(result.receipt.total_tax(), Decimal::MAX);
    }

    #[test]
    fn test_non_ascii_digit_taxes() {
        for text in ["١٢٠٠ ١٠٠ ٥٠", "１２００ １００ ５０"] {
            let result = parse_raw_output(Some(text)).unwrap();
            assert_eq!(
                result.receipt.taxes(),
                TaxFields {
                    tax_price: Decimal::new(1200, 0),
                    service_tax: Decimal::new(100, 0),
                    other_tax: Decimal::new(50, 0),
                }
            );
            assert_eq!(result.diagnostics, vec![Diagnostic::NoItemMatch]);
        }
    }
}
