//! Rendering of extraction results into the supported output formats.

mod json;
mod sheet;
mod template;
mod text;

use chrono::NaiveDateTime;

use airis_core::models::config::ExportConfig;
use airis_core::ExtractionResult;

pub use sheet::{render_csv, render_xlsx};
pub use template::render_template;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON receipt
    Json,
    /// Flattened single-row CSV
    Csv,
    /// Flattened single-row spreadsheet
    Xlsx,
    /// Purchase-request template spreadsheet
    Template,
    /// Plain text tables
    Text,
}

impl OutputFormat {
    /// File extension for generated file names.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx | OutputFormat::Template => "xlsx",
            OutputFormat::Text => "txt",
        }
    }

    /// Binary formats are never written to stdout.
    pub fn is_binary(self) -> bool {
        matches!(self, OutputFormat::Xlsx | OutputFormat::Template)
    }
}

/// Render a result in the requested format.
pub fn render(
    result: &ExtractionResult,
    format: OutputFormat,
    export: &ExportConfig,
) -> anyhow::Result<Vec<u8>> {
    let receipt = &result.receipt;

    match format {
        OutputFormat::Json => json::render_json(receipt),
        OutputFormat::Csv => render_csv(receipt),
        OutputFormat::Xlsx => render_xlsx(receipt, &export.sheet_name),
        OutputFormat::Template => render_template(receipt, &export.template),
        OutputFormat::Text => Ok(text::render_text(receipt).into_bytes()),
    }
}

/// Export file name: `<PREFIX>_EXTRACTED_DATA_<YYYYmmdd_HHMMSS>.<ext>`.
pub fn export_file_name(prefix: Option<&str>, extension: &str, timestamp: NaiveDateTime) -> String {
    let stamp = timestamp.format("%Y%m%d_%H%M%S");

    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}_EXTRACTED_DATA_{}.{}", prefix, stamp, extension),
        None => format!("EXTRACTED_DATA_{}.{}", stamp, extension),
    }
}

/// Convert a decimal to a spreadsheet number.
fn to_f64(value: rust_decimal::Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or_default()
}
