//! Error types for the airis-core library.

use thiserror::Error;

/// Main error type for the airis library.
#[derive(Error, Debug)]
pub enum AirisError {
    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Text recognition error.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the upstream recognition step.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// Failed to load recognition models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The recognizer failed on an image.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to receipt field extraction.
///
/// Everything the extractors can recover from is reported as a
/// [`Diagnostic`](crate::receipt::Diagnostic) instead; the only hard failure
/// is input that is not text at all.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No raw text was supplied, or it was not valid UTF-8.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Result type for the airis library.
pub type Result<T> = std::result::Result<T, AirisError>;
