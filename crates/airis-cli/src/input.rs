//! Input sources: raw recognized text (file or stdin) and receipt images.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use airis_core::models::config::RecognitionConfig;
use airis_core::{OnnxRecognizer, Recognizer};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

/// Where a receipt comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Text(PathBuf),
    Image(PathBuf),
}

impl Source {
    /// Classify an input argument. `-` is stdin.
    pub fn classify(input: &Path) -> anyhow::Result<Self> {
        if input.as_os_str() == "-" {
            return Ok(Source::Stdin);
        }

        let extension = input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" => Ok(Source::Text(input.to_path_buf())),
            ext if IMAGE_EXTENSIONS.contains(&ext) => Ok(Source::Image(input.to_path_buf())),
            _ => anyhow::bail!("Unsupported file format: {}", input.display()),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Source::Image(_))
    }

    /// Display name used in logs and summaries.
    pub fn name(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::Text(path) | Source::Image(path) => path.display().to_string(),
        }
    }
}

/// Read raw text bytes for a text source, or recognize an image.
///
/// Text is returned as bytes so that invalid UTF-8 reaches the parser and is
/// reported as malformed input.
pub fn load_raw(source: &Source, recognizer: Option<&dyn Recognizer>) -> anyhow::Result<Vec<u8>> {
    match source {
        Source::Stdin => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            debug!("Read {} bytes from stdin", buf.len());
            Ok(buf)
        }
        Source::Text(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            Ok(fs::read(path)?)
        }
        Source::Image(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            let recognizer = recognizer
                .ok_or_else(|| anyhow::anyhow!("No recognizer loaded for {}", path.display()))?;

            let image = image::open(path)?;
            let text = recognizer
                .recognize(&image)
                .map_err(|e| anyhow::anyhow!("Recognition failed for {}: {}", path.display(), e))?;
            Ok(text.into_bytes())
        }
    }
}

/// Load the ONNX recognizer, failing early when models are missing.
pub fn load_recognizer(config: &RecognitionConfig) -> anyhow::Result<OnnxRecognizer> {
    if !config.models_present() {
        anyhow::bail!(
            "Recognition models not found in {}.\n\n\
             Expected {} and {}; set recognition.model_dir with 'airis config set' \
             or pass --model-dir.",
            config.model_dir.display(),
            config.detection_model,
            config.recognition_model
        );
    }

    info!("Loading recognition models from {}", config.model_dir.display());

    OnnxRecognizer::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to load recognition models: {}", e))
}
