//! Tabular projections of receipts for export.

pub mod row;

pub use row::{flatten, CellValue, FlatRow, ITEM_FIELDS};
