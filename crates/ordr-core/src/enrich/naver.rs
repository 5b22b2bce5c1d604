//! Geocoding registry client (NCP Maps geocode).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{AddressRegistry, RegistryAddress, RegistrySearchResult};
use crate::error::RegistryError;
use crate::models::config::RegistryConfig;

/// Geocoding registry client.
pub struct NaverGeocodingClient {
    http: Client,
    api_url: String,
    client_id: String,
    client_secret: String,
}

impl NaverGeocodingClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.naver_api_url.clone(),
            client_id: config.naver_client_id.clone(),
            client_secret: config.naver_client_secret.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

#[async_trait]
impl AddressRegistry for NaverGeocodingClient {
    fn name(&self) -> &str {
        "naver"
    }

    async fn search(&self, keyword: &str) -> Result<RegistrySearchResult, RegistryError> {
        if !self.is_configured() {
            return Ok(RegistrySearchResult::empty());
        }

        debug!("Geocoding lookup: {}", keyword);
        let response = self
            .http
            .get(&self.api_url)
            .query(&[("query", keyword)])
            .header("X-NCP-APIGW-API-KEY-ID", &self.client_id)
            .header("X-NCP-APIGW-API-KEY", &self.client_secret)
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

/// First non-blank `roadAddress`. Anything else degrades to an empty result.
pub fn parse_response(body: &Value) -> Result<RegistrySearchResult, RegistryError> {
    if let Some(status) = body.get("status").and_then(Value::as_str) {
        if status != "OK" {
            let message = body
                .get("errorMessage")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(RegistryError::Api {
                code: status.to_string(),
                message,
            });
        }
    }

    let road = body
        .get("addresses")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|a| a.get("roadAddress").and_then(Value::as_str))
        .map(str::trim)
        .find(|a| !a.is_empty());

    Ok(match road {
        Some(road) => RegistrySearchResult {
            total_count: 1,
            addresses: vec![RegistryAddress::road(road)],
        },
        None => RegistrySearchResult::empty(),
    })
}
