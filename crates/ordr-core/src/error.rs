//! Error types for the ordr-core library.
//!
//! Text extraction never fails; only the OCR gateway and the registry
//! transports can raise, and both are caught at the batch-unit boundary.

use thiserror::Error;

/// Main error type for the ordr library.
#[derive(Error, Debug)]
pub enum OrdrError {
    /// OCR provider error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Address registry error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the OCR gateway.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No provider API key configured.
    #[error("OCR API key is not configured; set GOOGLE_CLOUD_API_KEY or ocr.api_key")]
    ApiKeyNotConfigured,

    /// Quota exhausted after every retry.
    #[error("OCR API quota exceeded, try again later")]
    RateLimited,

    /// Provider kept answering 5xx after every retry.
    #[error("OCR provider server error (HTTP {status}), try again later")]
    ServerError { status: u16 },

    /// Connection failed after every retry.
    #[error("cannot reach the OCR provider: {0}")]
    Network(String),

    /// Non-retryable HTTP error, carrying the user-facing message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body carried an `error` object.
    #[error("OCR provider error: {0}")]
    Provider(String),

    /// The image contained no recognizable text.
    #[error("no text detected in the image; check that it contains text")]
    NoTextDetected,

    /// The response could not be navigated.
    #[error("invalid OCR response format")]
    InvalidFormat,

    /// The response carried no result entries.
    #[error("empty OCR response")]
    EmptyResponse,
}

impl OcrError {
    /// Whether a retry could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OcrError::RateLimited | OcrError::ServerError { .. } | OcrError::Network(_)
        )
    }
}

/// Errors raised by address registry transports.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The registry answered with an error code.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for the ordr library.
pub type Result<T> = std::result::Result<T, OrdrError>;
