//! Address enrichment against postal registries.

mod engine;
pub mod juso;
pub mod naver;
pub mod query;

pub use engine::AddressEnrichmentEngine;
pub use juso::JusoClient;
pub use naver::NaverGeocodingClient;
pub use query::QueryVariant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// One candidate postal address returned by a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryAddress {
    pub road_addr: String,
    pub jibun_addr: String,
    pub zip_no: String,
}

impl RegistryAddress {
    /// Candidate with only a road address, as geocoders return.
    pub fn road(road_addr: impl Into<String>) -> Self {
        Self {
            road_addr: road_addr.into(),
            ..Default::default()
        }
    }
}

/// Ranked registry response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySearchResult {
    pub total_count: u32,
    pub addresses: Vec<RegistryAddress>,
}

impl RegistrySearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Road address of the top-ranked candidate, if the response is a hit.
    pub fn first_road_address(&self) -> Option<&str> {
        if self.total_count == 0 {
            return None;
        }
        self.addresses
            .first()
            .map(|a| a.road_addr.as_str())
            .filter(|a| !a.trim().is_empty())
    }
}

/// Keyword lookup against a postal registry.
#[async_trait]
pub trait AddressRegistry: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Search by free-text keyword, best match first.
    async fn search(&self, keyword: &str) -> Result<RegistrySearchResult, RegistryError>;
}
