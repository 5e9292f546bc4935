//! Token layouts of the recognition model's output.

use lazy_static::lazy_static;

use super::layout::{SlotKind, TokenLayout, TokenSlot};

/// Tax section: three consecutive amounts, in order tax price, service tax,
/// other tax.
pub const TAX_SLOTS: [TokenSlot; 3] = [
    TokenSlot::new("tax_price", SlotKind::Amount),
    TokenSlot::new("service_tax", SlotKind::Amount),
    TokenSlot::new("other_tax", SlotKind::Amount),
];

/// Line item: `T1 T2 T3 PRICE T5 T6 T7 T8 DESC T10`.
///
/// T1-T3 are not used. T5-T7 describe the embedded sub-item; T7 lands in the
/// sub-description as-is.
pub const ITEM_SLOTS: [TokenSlot; 10] = [
    TokenSlot::new("t1", SlotKind::Digits),
    TokenSlot::new("t2", SlotKind::Digits),
    TokenSlot::new("t3", SlotKind::Digits),
    TokenSlot::new("unit_price", SlotKind::Amount),
    TokenSlot::new("sub_unit_price", SlotKind::Digits),
    TokenSlot::new("sub_qty", SlotKind::Digits),
    TokenSlot::new("sub_description", SlotKind::Digits),
    TokenSlot::new("qty", SlotKind::Digits),
    TokenSlot::new("description", SlotKind::Text),
    TokenSlot::new("disc_item", SlotKind::Digits),
];

lazy_static! {
    pub static ref TAX_LAYOUT: TokenLayout = TokenLayout::new(&TAX_SLOTS).unwrap();

    pub static ref ITEM_LAYOUT: TokenLayout = TokenLayout::new(&ITEM_SLOTS).unwrap();
}
