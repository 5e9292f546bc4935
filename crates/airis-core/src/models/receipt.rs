//! Structured receipt data model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Description of the placeholder item used when no line item was recognized.
pub const NO_ITEMS_DESCRIPTION: &str = "No items detected.";

/// Sub-description of the placeholder item.
pub const NO_SUB_DETAILS_DESCRIPTION: &str = "No sub-details available.";

/// The three positional tax fields of a receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxFields {
    /// Tax price (first value of the tax triple).
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_price: Decimal,

    /// Service tax (second value).
    #[serde(with = "rust_decimal::serde::float")]
    pub service_tax: Decimal,

    /// Any other tax (third value).
    #[serde(with = "rust_decimal::serde::float")]
    pub other_tax: Decimal,
}

impl TaxFields {
    /// Sum of all three tax fields, saturating at the bounds of `Decimal`.
    pub fn total(&self) -> Decimal {
        self.tax_price
            .saturating_add(self.service_tax)
            .saturating_add(self.other_tax)
    }
}

/// A single line item, optionally carrying an embedded sub-item.
///
/// Numeric fields hold zero when their token was absent or unparsable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Unit price of the sub-item.
    #[serde(with = "rust_decimal::serde::float")]
    pub sub_unit_price: Decimal,

    /// Quantity of the sub-item.
    #[serde(with = "rust_decimal::serde::float")]
    pub sub_qty: Decimal,

    /// Sub-item description, kept as the raw recognized token.
    pub sub_description: String,

    /// Quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,

    /// Per-item discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub disc_item: Decimal,

    /// Product description.
    pub description: String,
}

impl LineItem {
    /// The placeholder inserted when a receipt has no recognizable items.
    pub fn sentinel() -> Self {
        Self {
            unit_price: Decimal::ZERO,
            sub_unit_price: Decimal::ZERO,
            sub_qty: Decimal::ZERO,
            sub_description: NO_SUB_DETAILS_DESCRIPTION.to_string(),
            qty: Decimal::ZERO,
            disc_item: Decimal::ZERO,
            description: NO_ITEMS_DESCRIPTION.to_string(),
        }
    }

    /// Whether this is the "no items detected" placeholder.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }

    /// Whether any sub-item detail is present.
    pub fn has_sub_details(&self) -> bool {
        !self.sub_description.is_empty()
            || !self.sub_unit_price.is_zero()
            || !self.sub_qty.is_zero()
    }
}

/// A fully assembled receipt.
///
/// Built once by the assembler and never mutated afterwards. `items` is never
/// empty: deserializing a record without items yields the sentinel item too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReceiptRecord")]
pub struct StructuredReceipt {
    #[serde(with = "rust_decimal::serde::float")]
    tax_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    service_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    other_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    discount: Decimal,
    items: Vec<LineItem>,
}

/// Unchecked wire form of a receipt, used for deserialization.
#[derive(Deserialize)]
struct ReceiptRecord {
    #[serde(default, with = "rust_decimal::serde::float")]
    tax_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    service_tax: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    other_tax: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    discount: Decimal,
    #[serde(default)]
    items: Vec<LineItem>,
}

impl From<ReceiptRecord> for StructuredReceipt {
    fn from(record: ReceiptRecord) -> Self {
        let taxes = TaxFields {
            tax_price: record.tax_price,
            service_tax: record.service_tax,
            other_tax: record.other_tax,
        };
        crate::receipt::assemble(taxes, record.discount, record.items)
    }
}

impl StructuredReceipt {
    /// Build a receipt from parts. `items` must already be non-empty.
    pub(crate) fn from_parts(taxes: TaxFields, discount: Decimal, items: Vec<LineItem>) -> Self {
        debug_assert!(!items.is_empty());
        Self {
            tax_price: taxes.tax_price,
            service_tax: taxes.service_tax,
            other_tax: taxes.other_tax,
            discount,
            items,
        }
    }

    pub fn tax_price(&self) -> Decimal {
        self.tax_price
    }

    pub fn service_tax(&self) -> Decimal {
        self.service_tax
    }

    pub fn other_tax(&self) -> Decimal {
        self.other_tax
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Line items in order of appearance in the raw text.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The tax fields as one value.
    pub fn taxes(&self) -> TaxFields {
        TaxFields {
            tax_price: self.tax_price,
            service_tax: self.service_tax,
            other_tax: self.other_tax,
        }
    }

    /// Sum of tax price, service tax and other tax.
    pub fn total_tax(&self) -> Decimal {
        self.taxes().total()
    }

    /// Whether no line item was recognized (only the sentinel is present).
    pub fn has_no_items(&self) -> bool {
        self.items.len() == 1 && self.items[0].is_sentinel()
    }

    /// Table rows for display: each item, followed by its sub-item when it
    /// has a sub-description.
    pub fn item_rows(&self) -> Vec<ItemRow> {
        let mut rows = Vec::with_capacity(self.items.len() * 2);

        for item in &self.items {
            rows.push(ItemRow {
                description: item.description.clone(),
                unit_price: item.unit_price,
                quantity: item.qty,
                discount: Some(item.disc_item),
            });

            if !item.sub_description.is_empty() {
                rows.push(ItemRow {
                    description: item.sub_description.clone(),
                    unit_price: item.sub_unit_price,
                    quantity: item.sub_qty,
                    discount: None,
                });
            }
        }

        rows
    }
}

/// One display row of the items table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    /// Sub-item rows carry no discount.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn coffee() -> LineItem {
        LineItem {
            unit_price: Decimal::new(4500, 0),
            sub_unit_price: Decimal::new(6, 0),
            sub_qty: Decimal::new(7, 0),
            sub_description: "8".to_string(),
            qty: Decimal::new(9, 0),
            disc_item: Decimal::new(10, 0),
            description: "Coffee".to_string(),
        }
    }

    #[test]
    fn test_sentinel_item() {
        let item = LineItem::sentinel();
        assert!(item.is_sentinel());
        assert_eq!(item.description, NO_ITEMS_DESCRIPTION);
        assert!(item.unit_price.is_zero());
        assert!(item.qty.is_zero());
        assert!(!coffee().is_sentinel());
    }

    #[test]
    fn test_total_tax() {
        let taxes = TaxFields {
            tax_price: Decimal::new(1200, 0),
            service_tax: Decimal::new(100, 0),
            other_tax: Decimal::new(50, 0),
        };
        let receipt = StructuredReceipt::from_parts(taxes, Decimal::ZERO, vec![coffee()]);
        assert_eq!(receipt.total_tax(), Decimal::new(1350, 0));
    }

    #[test]
    fn test_total_tax_saturates() {
        let taxes = TaxFields {
            tax_price: Decimal::MAX,
            service_tax: Decimal::MAX,
            other_tax: Decimal::MAX,
        };
        assert_eq!(taxes.total(), Decimal::MAX);

        let taxes = TaxFields {
            tax_price: Decimal::MIN,
            service_tax: Decimal::MIN,
            other_tax: Decimal::new(-5, 0),
        };
        assert_eq!(taxes.total(), Decimal::MIN);
    }

    #[test]
    fn test_item_rows_include_sub_item() {
        let mut plain = coffee();
        plain.sub_description.clear();
        let receipt = StructuredReceipt::from_parts(
            TaxFields::default(),
            Decimal::ZERO,
            vec![coffee(), plain],
        );

        let rows = receipt.item_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].description, "Coffee");
        assert_eq!(rows[0].discount, Some(Decimal::new(10, 0)));
        assert_eq!(rows[1].description, "8");
        assert_eq!(rows[1].unit_price, Decimal::new(6, 0));
        assert_eq!(rows[1].quantity, Decimal::new(7, 0));
        assert_eq!(rows[1].discount, None);
        assert_eq!(rows[2].description, "Coffee");
    }

    #[test]
    fn test_json_field_names() {
        let receipt = StructuredReceipt::from_parts(
            TaxFields {
                tax_price: Decimal::new(1200, 0),
                ..TaxFields::default()
            },
            Decimal::ZERO,
            vec![coffee()],
        );

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["tax_price"], serde_json::json!(1200.0));
        assert_eq!(json["discount"], serde_json::json!(0.0));
        let item = &json["items"][0];
        for key in [
            "unit_price",
            "sub_unit_price",
            "sub_qty",
            "sub_description",
            "qty",
            "disc_item",
            "description",
        ] {
            assert!(item.get(key).is_some(), "missing {key}");
        }
        assert_eq!(item["sub_description"], serde_json::json!("8"));
    }

    #[test]
    fn test_deserialize_without_items_inserts_sentinel() {
        let receipt: StructuredReceipt =
            serde_json::from_str(r#"{"tax_price": 5.0, "items": []}"#).unwrap();
        assert_eq!(receipt.tax_price(), Decimal::new(5, 0));
        assert!(receipt.has_no_items());
    }

    #[test]
    fn test_has_sub_details() {
        assert!(coffee().has_sub_details());

        let mut item = coffee();
        item.sub_description.clear();
        item.sub_unit_price = Decimal::ZERO;
        item.sub_qty = Decimal::ZERO;
        assert!(!item.has_sub_details());
    }
}
