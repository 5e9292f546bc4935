//! Flat-row exports: a header of flattened keys and a single data row.

use rust_xlsxwriter::Workbook;

use airis_core::{flatten, CellValue, StructuredReceipt};

use super::to_f64;

pub fn render_csv(receipt: &StructuredReceipt) -> anyhow::Result<Vec<u8>> {
    let row = flatten(receipt);
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(row.keys())?;
    wtr.write_record(row.values().map(ToString::to_string))?;

    Ok(wtr.into_inner()?)
}

pub fn render_xlsx(receipt: &StructuredReceipt, sheet_name: &str) -> anyhow::Result<Vec<u8>> {
    let row = flatten(receipt);
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, (key, value)) in row.iter().enumerate() {
        let col = u16::try_from(col)
            .map_err(|_| anyhow::anyhow!("Too many columns for one sheet: {}", row.len()))?;

        worksheet.write_string(0, col, key)?;
        match value {
            CellValue::Number(n) => worksheet.write_number(1, col, to_f64(*n))?,
            CellValue::Text(s) => worksheet.write_string(1, col, s)?,
        };
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use airis_core::parse_raw_output;

    #[test]
    fn test_csv_header_and_row() {
        let result = parse_raw_output(Some("1,200 100 50")).unwrap();
        let text = String::from_utf8(render_csv(&result.receipt).unwrap()).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some(
                "Tax Price,Service Tax,Other Tax,Discount,unit_price_1,sub_unit_price_1,\
                 sub_qty_1,sub_description_1,qty_1,disc_item_1,description_1"
            )
        );
        assert_eq!(
            lines.next(),
            Some("1200,100,50,0,0,0,0,No sub-details available.,0,0,No items detected.")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_xlsx_is_a_zip_container() {
        let result = parse_raw_output(Some("<s_menu> 1 2 3 4,500 6 7 8 9 Coffee 10 </s>")).unwrap();
        let bytes = render_xlsx(&result.receipt, "Extracted Data").unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_xlsx_rejects_invalid_sheet_name() {
        let result = parse_raw_output(Some("")).unwrap();
        assert!(render_xlsx(&result.receipt, "bad/name").is_err());
    }
}
