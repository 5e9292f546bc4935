//! Tax field extraction.
//!
//! The tax section is located positionally: the first three consecutive
//! amount tokens anywhere in the text. An unrelated numeric triple appearing
//! earlier (e.g. inside an item line) wins over the real tax section.

use tracing::{debug, warn};

use crate::models::receipt::TaxFields;
use crate::receipt::Diagnostic;

use super::numbers::normalize_field;
use super::patterns::TAX_LAYOUT;

/// Extract tax price, service tax and other tax from raw text.
///
/// Missing triples leave every field at zero and record
/// [`Diagnostic::NoTaxMatch`].
pub fn extract_taxes(text: &str, diagnostics: &mut Vec<Diagnostic>) -> TaxFields {
    let Some(found) = TAX_LAYOUT.find_first(text) else {
        warn!("No tax fields found in raw output");
        diagnostics.push(Diagnostic::NoTaxMatch);
        return TaxFields::default();
    };

    debug!("Tax triple matched at {:?}: {:?}", found.span(), found.as_str());

    TaxFields {
        tax_price: normalize_field("tax_price", &found.get("tax_price"), diagnostics),
        service_tax: normalize_field("service_tax", &found.get("service_tax"), diagnostics),
        other_tax: normalize_field("other_tax", &found.get("other_tax"), diagnostics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_extract_triple() {
        let mut diagnostics = Vec::new();
        let taxes = extract_taxes("1,200 100 50", &mut diagnostics);

        assert_eq!(
            taxes,
            TaxFields {
                tax_price: Decimal::new(1200, 0),
                service_tax: Decimal::new(100, 0),
                other_tax: Decimal::new(50, 0),
            }
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_first_triple_wins() {
        let mut diagnostics = Vec::new();
        let taxes = extract_taxes("TOTAL 7 8 9 then 1,000 200 30", &mut diagnostics);
        assert_eq!(taxes.tax_price, Decimal::new(7, 0));
        assert_eq!(taxes.service_tax, Decimal::new(8, 0));
        assert_eq!(taxes.other_tax, Decimal::new(9, 0));
    }

    #[test]
    fn test_no_triple() {
        let mut diagnostics = Vec::new();
        let taxes = extract_taxes("Coffee 12 Tea", &mut diagnostics);
        assert_eq!(taxes, TaxFields::default());
        assert_eq!(diagnostics, vec![Diagnostic::NoTaxMatch]);
    }

    #[test]
    fn test_separator_only_token_defaults() {
        let mut diagnostics = Vec::new();
        let taxes = extract_taxes(", 5 6", &mut diagnostics);
        assert_eq!(taxes.tax_price, Decimal::ZERO);
        assert_eq!(taxes.service_tax, Decimal::new(5, 0));
        assert_eq!(taxes.other_tax, Decimal::new(6, 0));
        assert!(matches!(
            diagnostics.as_slice(),
            [Diagnostic::NormalizationFailure { field, .. }] if field == "tax_price"
        ));
    }
}
