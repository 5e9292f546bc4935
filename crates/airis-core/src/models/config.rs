//! Configuration structures for the receipt pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AirisError, Result};

/// Main configuration for the airis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AirisConfig {
    /// Recognition backend configuration.
    pub recognition: RecognitionConfig,

    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// Recognition model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers in recognized text instead of blanking them.
    pub keep_unk: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl RecognitionConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }

    /// Whether the detection and recognition models exist on disk.
    pub fn models_present(&self) -> bool {
        self.model_path(&self.detection_model).exists()
            && self.model_path(&self.recognition_model).exists()
    }
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Discount recorded on every receipt (never present in recognized text).
    #[serde(with = "rust_decimal::serde::float")]
    pub default_discount: Decimal,
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Prefix for generated file names.
    pub file_prefix: Option<String>,

    /// Worksheet name for the flat-row spreadsheet export.
    pub sheet_name: String,

    /// Cell layout of the purchase-request template export.
    pub template: TemplateLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: None,
            sheet_name: "Extracted Data".to_string(),
            template: TemplateLayout::default(),
        }
    }
}

/// Where the template export places item fields and the tax total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    /// First 1-based row used for items.
    pub start_row: u32,

    /// Column letter for descriptions.
    pub description_column: String,

    /// Column letter for unit prices.
    pub unit_price_column: String,

    /// Column letter for quantities.
    pub qty_column: String,

    /// Column letter for per-item discounts.
    pub discount_column: String,

    /// Cell receiving the total tax (A1 notation).
    pub tax_cell: String,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            start_row: 13,
            description_column: "B".to_string(),
            unit_price_column: "Q".to_string(),
            qty_column: "T".to_string(),
            discount_column: "V".to_string(),
            tax_cell: "Y54".to_string(),
        }
    }
}

impl AirisConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AirisError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| AirisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
