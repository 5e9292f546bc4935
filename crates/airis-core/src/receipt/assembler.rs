//! Receipt assembly.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::receipt::{LineItem, StructuredReceipt, TaxFields};

/// Combine extracted parts into a receipt.
///
/// An empty item list is replaced by the single placeholder item; anything
/// else is kept as given.
pub fn assemble(taxes: TaxFields, discount: Decimal, items: Vec<LineItem>) -> StructuredReceipt {
    let items = if items.is_empty() {
        debug!("No items extracted, inserting placeholder item");
        vec![LineItem::sentinel()]
    } else {
        items
    };

    StructuredReceipt::from_parts(taxes, discount, items)
}
