//! Flattening of a receipt into a single row.
//!
//! Tax and discount fields come first under their display names, then every
//! item field suffixed with the item's 1-based position (`unit_price_1`,
//! `description_2`, ...).

use std::fmt;

use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::models::receipt::{LineItem, StructuredReceipt};

pub const TAX_PRICE_COLUMN: &str = "Tax Price";
pub const SERVICE_TAX_COLUMN: &str = "Service Tax";
pub const OTHER_TAX_COLUMN: &str = "Other Tax";
pub const DISCOUNT_COLUMN: &str = "Discount";

/// Item field names, in column order.
pub const ITEM_FIELDS: [&str; 7] = [
    "unit_price",
    "sub_unit_price",
    "sub_qty",
    "sub_description",
    "qty",
    "disc_item",
    "description",
];

/// A single cell of a flattened row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Number(Decimal),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n.normalize()),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) => rust_decimal::serde::float::serialize(n, serializer),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// An ordered key-value row. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRow {
    cells: Vec<(String, CellValue)>,
}

impl FlatRow {
    fn push(&mut self, key: impl Into<String>, value: CellValue) {
        self.cells.push((key.into(), value));
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Column headers, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Cell values, in column order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for FlatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn item_cells(item: &LineItem) -> [CellValue; 7] {
    [
        CellValue::Number(item.unit_price),
        CellValue::Number(item.sub_unit_price),
        CellValue::Number(item.sub_qty),
        CellValue::Text(item.sub_description.clone()),
        CellValue::Number(item.qty),
        CellValue::Number(item.disc_item),
        CellValue::Text(item.description.clone()),
    ]
}

/// Project a receipt onto one flat row.
pub fn flatten(receipt: &StructuredReceipt) -> FlatRow {
    let mut row = FlatRow::default();

    row.push(TAX_PRICE_COLUMN, CellValue::Number(receipt.tax_price()));
    row.push(SERVICE_TAX_COLUMN, CellValue::Number(receipt.service_tax()));
    row.push(OTHER_TAX_COLUMN, CellValue::Number(receipt.other_tax()));
    row.push(DISCOUNT_COLUMN, CellValue::Number(receipt.discount()));

    for (index, item) in receipt.items().iter().enumerate() {
        for (field, value) in ITEM_FIELDS.iter().zip(item_cells(item)) {
            row.push(format!("{}_{}", field, index + 1), value);
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{LayoutReceiptParser, ReceiptParser};
    use pretty_assertions::assert_eq;

    fn two_item_receipt() -> StructuredReceipt {
        let text = "1 2 3 4,500 6 7 8 9 Coffee 10\n1 1 1 12,000 0 0 0 1 Cheesecake 0";
        LayoutReceiptParser::new()
            .with_discount(Decimal::new(500, 0))
            .parse(text)
            .receipt
    }

    #[test]
    fn test_column_order() {
        let row = flatten(&two_item_receipt());
        let keys: Vec<&str> = row.keys().collect();

        assert_eq!(row.len(), 4 + 2 * ITEM_FIELDS.len());
        assert_eq!(
            &keys[..6],
            &["Tax Price", "Service Tax", "Other Tax", "Discount", "unit_price_1", "sub_unit_price_1"]
        );
        assert_eq!(keys.last(), Some(&"description_2"));
    }

    #[test]
    fn test_flatten_preserves_every_field() {
        let receipt = two_item_receipt();
        let row = flatten(&receipt);

        assert_eq!(row.get("Tax Price"), Some(&CellValue::Number(receipt.tax_price())));
        assert_eq!(row.get("Service Tax"), Some(&CellValue::Number(receipt.service_tax())));
        assert_eq!(row.get("Other Tax"), Some(&CellValue::Number(receipt.other_tax())));
        assert_eq!(row.get("Discount"), Some(&CellValue::Number(Decimal::new(500, 0))));

        for (i, item) in receipt.items().iter().enumerate() {
            for (field, expected) in ITEM_FIELDS.iter().zip(item_cells(item)) {
                let key = format!("{}_{}", field, i + 1);
                assert_eq!(row.get(&key), Some(&expected), "{key}");
            }
        }
        assert_eq!(
            row.get("description_2"),
            Some(&CellValue::Text("Cheesecake".to_string()))
        );
        assert_eq!(row.get("unit_price_2"), Some(&CellValue::Number(Decimal::new(12000, 0))));
    }

    #[test]
    fn test_keys_are_unique() {
        let row = flatten(&two_item_receipt());
        let mut keys: Vec<&str> = row.keys().collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), row.len());
    }

    #[test]
    fn test_sentinel_row() {
        let receipt = LayoutReceiptParser::new().parse("").receipt;
        let row = flatten(&receipt);
        assert_eq!(row.len(), 11);
        assert_eq!(
            row.get("description_1"),
            Some(&CellValue::Text("No items detected.".to_string()))
        );
        assert_eq!(row.get("description_2"), None);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let receipt = LayoutReceiptParser::new().parse("1,200 100 50").receipt;
        let json = serde_json::to_string(&flatten(&receipt)).unwrap();
        assert!(json.starts_with(r#"{"Tax Price":1200.0,"Service Tax":100.0,"Other Tax":50.0,"Discount":0.0,"unit_price_1":0.0"#));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(Decimal::new(45000, 1)).to_string(), "4500");
        assert_eq!(CellValue::Text("Tea".to_string()).to_string(), "Tea");
    }
}
