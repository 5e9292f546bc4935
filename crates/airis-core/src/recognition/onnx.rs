//! Recognizer backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::RecognitionError;
use crate::models::config::RecognitionConfig;

use super::Recognizer;

/// Boxes whose top edges fall in the same band of this many pixels are read
/// as one line.
const ROW_BAND_PX: f32 = 20.0;

/// ONNX text detection + recognition.
pub struct OnnxRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl OnnxRecognizer {
    /// Load the models named in `config` from its model directory.
    pub fn from_config(config: &RecognitionConfig) -> Result<Self, RecognitionError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| RecognitionError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }
}

impl Recognizer for OnnxRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, RecognitionError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        if width == 0 || height == 0 {
            return Err(RecognitionError::InvalidImage(format!(
                "empty image {}x{}",
                width, height
            )));
        }

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| RecognitionError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut regions: Vec<(f32, f32, String)> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                (x, y, text)
            })
            .collect();

        regions.sort_by(|a, b| {
            let row_a = (a.1 / ROW_BAND_PX) as i32;
            let row_b = (b.1 / ROW_BAND_PX) as i32;
            row_a
                .cmp(&row_b)
                .then(a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        });

        let text = join_rows(&regions);

        info!(
            "Recognized {} regions from {}x{} image in {}ms",
            regions.len(),
            width,
            height,
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Join sorted regions: same row with spaces, rows with newlines.
fn join_rows(regions: &[(f32, f32, String)]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current_row: Option<i32> = None;

    for (_, y, text) in regions {
        let row = (*y / ROW_BAND_PX) as i32;
        if current_row == Some(row) {
            if let Some(line) = lines.last_mut() {
                line.push(' ');
                line.push_str(text.trim());
            }
        } else {
            lines.push(text.trim().to_string());
        }
        current_row = Some(row);
    }

    lines.join("\n")
}

/// Minimum x and y of a detection polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_rows() {
        let regions = vec![
            (0.0, 2.0, "1".to_string()),
            (30.0, 5.0, "2".to_string()),
            (0.0, 41.0, "Coffee ".to_string()),
            (50.0, 45.0, "10".to_string()),
        ];
        assert_eq!(join_rows(&regions), "1 2\nCoffee 10");
    }
}
