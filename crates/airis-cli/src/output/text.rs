//! Plain text tables for terminal output.

use rust_decimal::Decimal;

use airis_core::StructuredReceipt;

/// Plain text rendering: the taxes table then the items table.
pub fn render_text(receipt: &StructuredReceipt) -> String {
    let mut output = String::new();

    output.push_str("Taxes:\n");
    let taxes = [
        ("Tax Price", receipt.tax_price()),
        ("Service Tax", receipt.service_tax()),
        ("Other Tax", receipt.other_tax()),
        ("Total Tax", receipt.total_tax()),
        ("Discount", receipt.discount()),
    ];
    for (label, value) in taxes {
        output.push_str(&format!("  {:<12} {:>12}\n", label, amount(value)));
    }
    output.push('\n');

    let rows = receipt.item_rows();
    let width = rows
        .iter()
        .map(|r| r.description.chars().count())
        .max()
        .unwrap_or(0)
        .max("Description".len());

    output.push_str("Items:\n");
    output.push_str(&format!(
        "  {:<width$}  {:>12}  {:>8}  {:>10}\n",
        "Description",
        "Unit Price",
        "Qty",
        "Discount",
        width = width
    ));
    for row in &rows {
        let discount = row.discount.map(amount).unwrap_or_default();
        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>8}  {:>10}\n",
            row.description,
            amount(row.unit_price),
            amount(row.quantity),
            discount,
            width = width
        ));
    }

    output
}

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use airis_core::parse_raw_output;

    #[test]
    fn test_taxes_table_has_total() {
        let result = parse_raw_output(Some("1,200 100 50")).unwrap();
        let text = render_text(&result.receipt);

        assert!(text.contains("Total Tax"));
        assert!(text.contains("1350"));
        assert!(text.contains("No items detected."));
        assert!(text.contains("No sub-details available."));
    }

    #[test]
    fn test_table_layout() {
        let result = parse_raw_output(Some("1,200 100 50")).unwrap();
        let text = render_text(&result.receipt);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Taxes:");
        assert_eq!(lines[1], "  Tax Price            1200");
        assert_eq!(lines[4], "  Total Tax            1350");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Items:");
        assert!(lines[8].trim_start().starts_with("Description"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_sub_row_follows_item() {
        let result = parse_raw_output(Some("<s_menu> 1 2 3 4,500 6 7 8 9 Coffee 10 </s>")).unwrap();
        let text = render_text(&result.receipt);
        let item_lines: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "Items:")
            .skip(2)
            .collect();

        assert_eq!(item_lines.len(), 2);
        assert!(item_lines[0].trim_start().starts_with("Coffee"));
        assert!(item_lines[0].trim_end().ends_with("10"));
        assert!(item_lines[1].trim_start().starts_with('8'));
        assert!(item_lines[1].trim_end().ends_with('7'));
    }
}
