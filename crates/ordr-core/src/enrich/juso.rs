//! Road-address registry client (business.juso.go.kr).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{AddressRegistry, RegistryAddress, RegistrySearchResult};
use crate::error::RegistryError;
use crate::models::config::RegistryConfig;

/// Only the best match is ever used.
const COUNT_PER_PAGE: u32 = 1;

/// Road-address registry client.
pub struct JusoClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl JusoClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.juso_api_url.clone(),
            api_key: config.juso_api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[async_trait]
impl AddressRegistry for JusoClient {
    fn name(&self) -> &str {
        "juso"
    }

    async fn search(&self, keyword: &str) -> Result<RegistrySearchResult, RegistryError> {
        if !self.is_configured() {
            warn!("JUSO_API_KEY is not configured, skipping road-address lookup");
            return Ok(RegistrySearchResult::empty());
        }

        debug!("Road-address lookup: {}", keyword);
        let count = COUNT_PER_PAGE.to_string();
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("confmKey", self.api_key.as_str()),
                ("currentPage", "1"),
                ("countPerPage", count.as_str()),
                ("keyword", keyword),
                ("resultType", "json"),
            ])
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Api {
                code: status.as_u16().to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))?;
        parse_response(&body)
    }
}

/// Decode a registry response. Missing sections or fields, `errorCode`
/// included, degrade to an empty result; a non-zero `errorCode` is an API
/// error.
pub fn parse_response(body: &Value) -> Result<RegistrySearchResult, RegistryError> {
    let Some(results) = body.get("results") else {
        return Ok(RegistrySearchResult::empty());
    };
    let Some(common) = results.get("common") else {
        return Ok(RegistrySearchResult::empty());
    };

    let error_code = common.get("errorCode").map(value_text).unwrap_or_default();
    if error_code.is_empty() {
        return Ok(RegistrySearchResult::empty());
    }
    if error_code != "0" {
        let message = common
            .get("errorMessage")
            .map(value_text)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(RegistryError::Api {
            code: error_code,
            message,
        });
    }

    let total_count = common
        .get("totalCount")
        .and_then(|v| match v {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(0);

    let Some(entries) = results.get("juso").and_then(Value::as_array) else {
        return Ok(RegistrySearchResult::empty());
    };

    let addresses = entries
        .iter()
        .map(|entry| RegistryAddress {
            road_addr: entry.get("roadAddr").map(value_text).unwrap_or_default(),
            jibun_addr: entry.get("jibunAddr").map(value_text).unwrap_or_default(),
            zip_no: entry.get("zipNo").map(value_text).unwrap_or_default(),
        })
        .collect();

    Ok(RegistrySearchResult {
        total_count,
        addresses,
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
