//! Purchase-request template export.
//!
//! Items are laid out one per row from the layout's start row; an item with
//! sub-details takes a second row for them. The total tax goes to a fixed cell.

use rust_xlsxwriter::Workbook;

use airis_core::models::config::TemplateLayout;
use airis_core::{CellValue, StructuredReceipt};

use super::to_f64;

/// A cell to write, zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
}

impl PlacedCell {
    fn new(row: u32, col: u16, value: CellValue) -> Self {
        Self { row, col, value }
    }
}

pub fn render_template(
    receipt: &StructuredReceipt,
    layout: &TemplateLayout,
) -> anyhow::Result<Vec<u8>> {
    let cells = place_cells(receipt, layout)?;
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for cell in &cells {
        match &cell.value {
            CellValue::Number(n) => worksheet.write_number(cell.row, cell.col, to_f64(*n))?,
            CellValue::Text(s) => worksheet.write_string(cell.row, cell.col, s)?,
        };
    }

    Ok(workbook.save_to_buffer()?)
}

/// Compute every cell written for `receipt` under `layout`.
pub fn place_cells(
    receipt: &StructuredReceipt,
    layout: &TemplateLayout,
) -> anyhow::Result<Vec<PlacedCell>> {
    if layout.start_row == 0 {
        anyhow::bail!("Template start row is 1-based, got 0");
    }

    let description = column_index(&layout.description_column)?;
    let unit_price = column_index(&layout.unit_price_column)?;
    let qty = column_index(&layout.qty_column)?;
    let discount = column_index(&layout.discount_column)?;
    let (tax_row, tax_col) = cell_position(&layout.tax_cell)?;

    let mut cells = Vec::new();
    let mut row = layout.start_row - 1;

    for item in receipt.items() {
        cells.push(PlacedCell::new(row, description, CellValue::Text(item.description.clone())));
        cells.push(PlacedCell::new(row, unit_price, CellValue::Number(item.unit_price)));
        cells.push(PlacedCell::new(row, qty, CellValue::Number(item.qty)));
        cells.push(PlacedCell::new(row, discount, CellValue::Number(item.disc_item)));

        if item.has_sub_details() {
            row += 1;
            cells.push(PlacedCell::new(
                row,
                description,
                CellValue::Text(item.sub_description.clone()),
            ));
            cells.push(PlacedCell::new(row, unit_price, CellValue::Number(item.sub_unit_price)));
            cells.push(PlacedCell::new(row, qty, CellValue::Number(item.sub_qty)));
        }

        row += 1;
    }

    cells.push(PlacedCell::new(tax_row, tax_col, CellValue::Number(receipt.total_tax())));

    Ok(cells)
}

/// Zero-based index of a column given in letters ("A" = 0, "AA" = 26).
fn column_index(letters: &str) -> anyhow::Result<u16> {
    let letters = letters.trim();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        anyhow::bail!("Invalid column: {:?}", letters);
    }

    let mut index: u32 = 0;
    for c in letters.chars() {
        let digit = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
        index = index * 26 + digit;
        // XFD, the last spreadsheet column
        if index > 16_384 {
            anyhow::bail!("Column out of range: {}", letters);
        }
    }

    Ok((index - 1) as u16)
}

/// Zero-based (row, column) of a cell in A1 notation.
fn cell_position(reference: &str) -> anyhow::Result<(u32, u16)> {
    let reference = reference.trim();
    let split = reference
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| anyhow::anyhow!("Invalid cell reference: {:?}", reference))?;
    let (letters, digits) = reference.split_at(split);

    let col = column_index(letters)?;
    let row: u32 = digits
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid cell reference: {:?}", reference))?;
    if row == 0 {
        anyhow::bail!("Invalid cell reference: {:?}", reference);
    }

    Ok((row - 1, col))
}
