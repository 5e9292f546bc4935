//! Layout-based field extractors for recognized receipt text.

pub mod items;
pub mod layout;
pub mod numbers;
pub mod patterns;
pub mod taxes;

pub use items::extract_items;
pub use layout::{LayoutError, LayoutMatch, SlotKind, TokenLayout, TokenSlot};
pub use numbers::{normalize, normalize_field, DefaultReason, Normalize, Normalized};
pub use patterns::{ITEM_LAYOUT, TAX_LAYOUT};
pub use taxes::extract_taxes;
