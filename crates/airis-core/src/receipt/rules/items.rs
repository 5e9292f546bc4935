//! Line item extraction.

use tracing::debug;

use crate::models::receipt::LineItem;
use crate::receipt::Diagnostic;

use super::layout::LayoutMatch;
use super::numbers::normalize_field;
use super::patterns::ITEM_LAYOUT;

/// Scan raw text for every item line, in order of appearance.
///
/// Returns an empty list when nothing matches; the placeholder item is the
/// assembler's business.
pub fn extract_items(text: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<LineItem> {
    let items: Vec<LineItem> = ITEM_LAYOUT
        .find_all(text)
        .map(|found| item_from_match(&found, diagnostics))
        .collect();

    debug!("Matched {} item lines", items.len());

    items
}

fn item_from_match(found: &LayoutMatch<'_>, diagnostics: &mut Vec<Diagnostic>) -> LineItem {
    LineItem {
        unit_price: normalize_field("unit_price", &found.get("unit_price"), diagnostics),
        sub_unit_price: normalize_field("sub_unit_price", &found.get("sub_unit_price"), diagnostics),
        sub_qty: normalize_field("sub_qty", &found.get("sub_qty"), diagnostics),
        sub_description: found.get("sub_description").unwrap_or_default().to_string(),
        qty: normalize_field("qty", &found.get("qty"), diagnostics),
        disc_item: normalize_field("disc_item", &found.get("disc_item"), diagnostics),
        description: found.get("description").unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_single_item() {
        let mut diagnostics = Vec::new();
        let items = extract_items("1 2 3 4,500 6 7 8 9 Coffee 10", &mut diagnostics);

        assert_eq!(
            items,
            vec![LineItem {
                unit_price: Decimal::new(4500, 0),
                sub_unit_price: Decimal::new(6, 0),
                sub_qty: Decimal::new(7, 0),
                sub_description: "8".to_string(),
                qty: Decimal::new(9, 0),
                disc_item: Decimal::new(10, 0),
                description: "Coffee".to_string(),
            }]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_multi_word_description() {
        let mut diagnostics = Vec::new();
        let items = extract_items("1 1 1 25,000 0 0 0 2 Iced Caramel Latte 0", &mut diagnostics);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Iced Caramel Latte");
        assert_eq!(items[0].qty, Decimal::new(2, 0));
        assert_eq!(items[0].unit_price, Decimal::new(25000, 0));
    }

    #[test]
    fn test_items_in_order_of_appearance() {
        let text = "1 2 3 4,500 6 7 8 9 Coffee 10\n\
                    1 1 1 12,000 0 0 0 1 Cheesecake 0\n\
                    1 2 3 4,500 6 7 8 9 Coffee 10";
        let mut diagnostics = Vec::new();
        let items = extract_items(text, &mut diagnostics);

        let names: Vec<_> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, vec!["Coffee", "Cheesecake", "Coffee"]);
        assert_eq!(items[0], items[2]);
    }

    #[test]
    fn test_no_items() {
        let mut diagnostics = Vec::new();
        assert!(extract_items("1,200 100 50", &mut diagnostics).is_empty());
        assert!(extract_items("", &mut diagnostics).is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_separator_only_price_defaults() {
        let mut diagnostics = Vec::new();
        let items = extract_items("1 2 3 , 6 7 8 9 Tea 1", &mut diagnostics);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, Decimal::ZERO);
        assert_eq!(diagnostics.len(), 1);
    }
}
