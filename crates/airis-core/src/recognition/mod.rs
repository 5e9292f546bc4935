//! The recognition contract: image in, raw text out.
//!
//! Extraction only ever sees the text a [`Recognizer`] returns; how the
//! underlying model is loaded or cached is up to the implementation.

#[cfg(feature = "native")]
mod onnx;

#[cfg(feature = "native")]
pub use onnx::OnnxRecognizer;

use image::DynamicImage;

use crate::error::RecognitionError;

/// Turns a receipt image into raw text.
pub trait Recognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, RecognitionError>;
}

/// Returns a pre-set text for every image.
///
/// Used for text that was recognized elsewhere, and in tests.
#[derive(Debug, Clone)]
pub struct StaticRecognizer {
    text: String,
}

impl StaticRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Recognizer for StaticRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, RecognitionError> {
        Ok(self.text.clone())
    }
}
