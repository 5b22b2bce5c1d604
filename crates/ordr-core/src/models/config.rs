//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{OrdrError, Result};

/// Main configuration for the ordr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdrConfig {
    /// OCR provider configuration.
    pub ocr: OcrConfig,

    /// Address registry configuration.
    pub registry: RegistryConfig,

    /// Batch admission limits.
    pub batch: BatchConfig,

    /// Field extraction tuning.
    pub extraction: ExtractionConfig,

    /// Business defaults for records.
    pub order: OrderConfig,

    /// OCR usage counter.
    pub usage: UsageConfig,
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Provider API key.
    pub api_key: String,

    /// Annotate endpoint.
    pub api_url: String,

    /// Script hints sent with every request.
    pub language_hints: Vec<String>,

    /// Total attempts for transient failures.
    pub max_attempts: u32,

    /// First backoff delay, doubled after every failed attempt.
    pub initial_backoff_ms: u64,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            language_hints: vec!["ko".to_string(), "th".to_string()],
            max_attempts: 3,
            initial_backoff_ms: 1000,
            timeout_secs: 60,
        }
    }
}

/// Address registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Road-address registry key.
    pub juso_api_key: String,

    /// Road-address registry endpoint.
    pub juso_api_url: String,

    /// Geocoding registry client id.
    pub naver_client_id: String,

    /// Geocoding registry client secret.
    pub naver_client_secret: String,

    /// Geocoding registry endpoint.
    pub naver_api_url: String,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            juso_api_key: String::new(),
            juso_api_url: "https://business.juso.go.kr/addrlink/addrLinkApi.do".to_string(),
            naver_client_id: String::new(),
            naver_client_secret: String::new(),
            naver_api_url: "https://naveropenapi.apigw.ntruss.com/map-geocode/v2/geocode"
                .to_string(),
            timeout_secs: 10,
        }
    }
}

/// Batch admission limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Concurrent OCR calls.
    pub max_concurrent_ocr: usize,

    /// Concurrent enrichment calls.
    pub max_concurrent_enrichment: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_ocr: 20,
            max_concurrent_enrichment: 10,
        }
    }
}

/// Field extraction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How many lines around the phone line a name may sit.
    pub name_search_radius: usize,

    /// How many leading lines count as the top of the block.
    pub top_block_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_search_radius: 4,
            top_block_lines: 5,
        }
    }
}

/// Business defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Phone number used when OCR finds none.
    pub default_phone: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            default_phone: "01086100102".to_string(),
        }
    }
}

/// OCR usage counter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Persistence file.
    pub file: PathBuf,

    /// Free calls per month.
    pub free_limit: u32,

    /// Cost of every call beyond the free limit.
    pub cost_per_call: f64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("data").join("api-usage.json"),
            free_limit: 1000,
            cost_per_call: 0.0015,
        }
    }
}

impl OrdrConfig {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject limits that would stall the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.batch.max_concurrent_ocr == 0 || self.batch.max_concurrent_enrichment == 0 {
            return Err(OrdrError::Config(
                "batch concurrency limits must be at least 1".to_string(),
            ));
        }
        if self.ocr.max_attempts == 0 {
            return Err(OrdrError::Config("ocr.max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Override secrets and defaults from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Override from an arbitrary lookup; empty values are ignored.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("GOOGLE_CLOUD_API_KEY") {
            self.ocr.api_key = v;
        }
        if let Some(v) = get("JUSO_API_KEY") {
            self.registry.juso_api_key = v;
        }
        if let Some(v) = get("NAVER_CLIENT_ID") {
            self.registry.naver_client_id = v;
        }
        if let Some(v) = get("NAVER_CLIENT_SECRET") {
            self.registry.naver_client_secret = v;
        }
        if let Some(v) = get("ORDER_DEFAULT_PHONE") {
            self.order.default_phone = v;
        }
        self
    }
}
