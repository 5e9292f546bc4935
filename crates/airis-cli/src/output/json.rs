//! JSON export of a structured receipt.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use airis_core::StructuredReceipt;

/// JSON with four-space indentation.
pub fn render_json(receipt: &StructuredReceipt) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    receipt.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
