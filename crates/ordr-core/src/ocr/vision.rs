//! Google Cloud Vision full-text detection client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use super::{OcrProvider, retry_transient, user_message_for_status};
use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::usage::UsageTracker;

/// Vision `images:annotate` client.
pub struct VisionClient {
    http: Client,
    config: OcrConfig,
    usage: Option<Arc<UsageTracker>>,
}

impl VisionClient {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Network(e.to_string()))?;

        Ok(Self {
            http,
            config: config.clone(),
            usage: None,
        })
    }

    /// Count every successful provider exchange.
    pub fn with_usage_tracker(mut self, usage: Arc<UsageTracker>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    /// Annotate request for one image.
    pub fn request_body(&self, image: &[u8]) -> Value {
        json!({
            "requests": [{
                "image": {"content": STANDARD.encode(image)},
                "features": [{"type": "DOCUMENT_TEXT_DETECTION"}],
                "imageContext": {"languageHints": self.config.language_hints},
            }]
        })
    }

    async fn call_once(&self, body: &Value) -> Result<Value, OcrError> {
        let response = self
            .http
            .post(&self.config.api_url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| OcrError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200..=299 => {}
            429 => return Err(OcrError::RateLimited),
            500..=599 => return Err(OcrError::ServerError { status }),
            _ => {
                let detail = response.text().await.unwrap_or_default();
                error!("Vision API call failed (HTTP {}): {}", status, detail);
                return Err(OcrError::Api {
                    status,
                    message: user_message_for_status(status),
                });
            }
        }

        if let Some(usage) = &self.usage {
            usage.increment();
        }

        response.json().await.map_err(|_| OcrError::InvalidFormat)
    }
}

#[async_trait]
impl OcrProvider for VisionClient {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        if !self.is_configured() {
            return Err(OcrError::ApiKeyNotConfigured);
        }

        let body = self.request_body(image);
        let request = &body;
        let response = retry_transient(
            "Vision API call",
            self.config.max_attempts,
            self.config.initial_backoff_ms,
            move || self.call_once(request),
        )
        .await?;

        let text = extract_text(&response)?;
        info!("OCR recognized {} characters", text.chars().count());
        debug!("OCR text:\n{}", text);
        Ok(text)
    }
}

/// Navigate to `responses[0].fullTextAnnotation.text`.
pub fn extract_text(response: &Value) -> Result<String, OcrError> {
    if let Some(err) = response.get("error") {
        return Err(OcrError::Provider(error_message(err)));
    }

    let responses = response
        .get("responses")
        .and_then(Value::as_array)
        .ok_or(OcrError::InvalidFormat)?;
    let first = responses.first().ok_or(OcrError::EmptyResponse)?;

    if let Some(err) = first.get("error") {
        return Err(OcrError::Provider(format!("image processing failed: {}", error_message(err))));
    }

    first
        .get("fullTextAnnotation")
        .and_then(|a| a.get("text"))
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .ok_or(OcrError::NoTextDetected)
}

fn error_message(err: &Value) -> String {
    err.get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text() {
        let response = json!({
            "responses": [{"fullTextAnnotation": {"text": "서울특별시 강남구 테헤란로\n152\n"}}]
        });
        assert_eq!(extract_text(&response).unwrap(), "서울특별시 강남구 테헤란로\n152\n");
    }

    #[test]
    fn test_extract_text_errors() {
        assert!(matches!(
            extract_text(&json!({"error": {"code": 403, "message": "API disabled"}})),
            Err(OcrError::Provider(m)) if m == "API disabled"
        ));
        assert!(matches!(extract_text(&json!({})), Err(OcrError::InvalidFormat)));
        assert!(matches!(extract_text(&json!({"responses": []})), Err(OcrError::EmptyResponse)));
        assert!(matches!(
            extract_text(&json!({"responses": [{"error": {"message": "Bad image data"}}]})),
            Err(OcrError::Provider(m)) if m.contains("Bad image data")
        ));
        assert!(matches!(extract_text(&json!({"responses": [{}]})), Err(OcrError::NoTextDetected)));
        assert!(matches!(
            extract_text(&json!({"responses": [{"fullTextAnnotation": {"text": "  "}}]})),
            Err(OcrError::NoTextDetected)
        ));
    }

    #[test]
    fn test_request_body() {
        let client = VisionClient::new(&OcrConfig::default()).unwrap();
        let body = client.request_body(b"abc");
        let request = &body["requests"][0];

        assert_eq!(request["image"]["content"], "YWJj");
        assert_eq!(request["features"][0]["type"], "DOCUMENT_TEXT_DETECTION");
        assert_eq!(request["imageContext"]["languageHints"], json!(["ko", "th"]));
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let client = VisionClient::new(&OcrConfig::default()).unwrap();
        assert!(matches!(
            client.recognize(b"image").await,
            Err(OcrError::ApiKeyNotConfigured)
        ));
    }
}
