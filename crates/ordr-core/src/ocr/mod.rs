//! OCR provider boundary.

mod vision;

pub use vision::{VisionClient, extract_text};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::OcrError;

/// Turns image bytes into raw text.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// User-facing message for a non-retryable HTTP status.
pub fn user_message_for_status(status: u16) -> String {
    match status {
        400 => "bad request, check the image format".to_string(),
        401 | 403 => {
            "API key is invalid or the Vision API is not enabled for the project".to_string()
        }
        429 => "API quota exceeded, try again later".to_string(),
        other => format!("provider API error (HTTP {})", other),
    }
}

/// Delay before retry number `attempt` (0-based): `initial * 2^attempt`.
pub fn backoff_delay(initial_backoff_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(initial_backoff_ms.saturating_mul(1u64 << attempt.min(16)))
}

/// Run `operation` up to `max_attempts` times, sleeping with exponential
/// backoff after each transient failure. Permanent errors return at once.
pub async fn retry_transient<F, Fut, T>(
    operation_name: &str,
    max_attempts: u32,
    initial_backoff_ms: u64,
    mut operation: F,
) -> Result<T, OcrError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OcrError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt + 1 < max_attempts => {
                let delay = backoff_delay(initial_backoff_ms, attempt);
                warn!(
                    "{} failed ({}), retry {}/{} in {:?}",
                    operation_name,
                    e,
                    attempt + 1,
                    max_attempts - 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
