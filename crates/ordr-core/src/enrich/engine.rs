//! Address resolution against a primary road-address registry with a
//! geocoding registry as fallback.

use tracing::{debug, info, warn};

use crate::error::RegistryError;
use crate::models::config::RegistryConfig;
use crate::models::order::{FOREIGN_SENTINEL, RECOGNITION_FAILURE_MARKER};

use super::query::{
    build_variants, combine_with_detail, extract_road_name_query, is_detailed_address,
    normalize_region_name, normalize_road_spacing, split_building_detail,
};
use super::{AddressRegistry, JusoClient, NaverGeocodingClient};

/// Resolves extracted addresses to registry-confirmed ones.
///
/// Never fails: registry errors are logged and treated as misses, and an
/// unresolved address comes back unchanged with `valid = false`.
pub struct AddressEnrichmentEngine {
    primary: Box<dyn AddressRegistry>,
    secondary: Box<dyn AddressRegistry>,
}

impl AddressEnrichmentEngine {
    pub fn new(primary: Box<dyn AddressRegistry>, secondary: Box<dyn AddressRegistry>) -> Self {
        Self { primary, secondary }
    }

    /// Road-address registry first, geocoder second.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(
            Box::new(JusoClient::new(config)?),
            Box::new(NaverGeocodingClient::new(config)?),
        ))
    }

    /// Resolve `address`, returning the registry form and whether a registry
    /// confirmed it.
    pub async fn enrich(&self, address: &str) -> (String, bool) {
        if address.trim().is_empty()
            || address == FOREIGN_SENTINEL
            || address.starts_with(RECOGNITION_FAILURE_MARKER)
        {
            return (address.to_string(), false);
        }

        if is_detailed_address(address) {
            if let Some((base, detail)) = split_building_detail(address) {
                return self.enrich_detailed(address, &base, &detail).await;
            }
            debug!("Detailed address without a separable unit, not looked up: {}", address);
            return (address.to_string(), false);
        }

        let normalized = normalize_region_name(address);
        let variants = build_variants(&normalized);

        for registry in [&self.primary, &self.secondary] {
            for variant in &variants {
                if let Some(found) = self.lookup(registry.as_ref(), &variant.query).await {
                    let enriched = variant.resolve(&found);
                    info!("Address corrected ({}): {:?} -> {:?}", registry.name(), address, enriched);
                    return (enriched, true);
                }
            }
        }

        info!("Address not found in any registry, keeping original: {:?}", address);
        (address.to_string(), false)
    }

    /// Search only the base part, then put the unit detail back.
    async fn enrich_detailed(&self, address: &str, base: &str, detail: &str) -> (String, bool) {
        let base = normalize_road_spacing(&normalize_region_name(base));

        let mut queries = vec![base.clone()];
        if let Some(road_only) = extract_road_name_query(&base).filter(|q| *q != base) {
            queries.push(road_only);
        }

        for query in &queries {
            if let Some(found) = self.lookup(self.primary.as_ref(), query).await {
                let enriched = combine_with_detail(&found, detail);
                info!("Address corrected ({}, unit kept): {:?} -> {:?}", self.primary.name(), address, enriched);
                return (enriched, true);
            }
        }

        info!("Detailed address not confirmed, keeping original: {:?}", address);
        (address.to_string(), false)
    }

    async fn lookup(&self, registry: &dyn AddressRegistry, query: &str) -> Option<String> {
        match registry.search(query).await {
            Ok(result) => result.first_road_address().map(str::to_string),
            Err(e) => {
                warn!("{} lookup failed for {:?}: {}", registry.name(), query, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{RegistryAddress, RegistrySearchResult};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeRegistry {
        name: &'static str,
        hits: HashMap<String, String>,
        fail: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeRegistry {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                ..Default::default()
            }
        }

        fn hit(mut self, query: &str, road_addr: &str) -> Self {
            self.hits.insert(query.to_string(), road_addr.to_string());
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    #[async_trait]
    impl AddressRegistry for FakeRegistry {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, keyword: &str) -> Result<RegistrySearchResult, RegistryError> {
            self.calls.lock().unwrap().push(keyword.to_string());
            if self.fail {
                return Err(RegistryError::Network("connection refused".to_string()));
            }
            Ok(match self.hits.get(keyword) {
                Some(road) => RegistrySearchResult {
                    total_count: 1,
                    addresses: vec![RegistryAddress::road(road.clone())],
                },
                None => RegistrySearchResult::empty(),
            })
        }
    }

    fn engine(primary: FakeRegistry, secondary: FakeRegistry) -> AddressEnrichmentEngine {
        AddressEnrichmentEngine::new(Box::new(primary), Box::new(secondary))
    }

    #[tokio::test]
    async fn test_primary_hit() {
        let primary = FakeRegistry::new("juso").hit("신전로 221-8", "전북특별자치도 김제시 신전로 221-8");
        let engine = engine(primary, FakeRegistry::new("naver"));

        assert_eq!(
            engine.enrich("신전로 221-8").await,
            ("전북특별자치도 김제시 신전로 221-8".to_string(), true)
        );
    }

    #[tokio::test]
    async fn test_miss_everywhere_keeps_original() {
        let primary = FakeRegistry::new("juso");
        let secondary = FakeRegistry::new("naver");
        let primary_calls = primary.calls.clone();
        let secondary_calls = secondary.calls.clone();
        let engine = engine(primary, secondary);

        assert_eq!(
            engine.enrich("알수없는주소123").await,
            ("알수없는주소123".to_string(), false)
        );
        assert_eq!(*primary_calls.lock().unwrap(), vec!["알수없는주소123"]);
        assert_eq!(*secondary_calls.lock().unwrap(), vec!["알수없는주소123"]);
    }

    #[tokio::test]
    async fn test_sentinels_short_circuit() {
        let primary = FakeRegistry::new("juso");
        let calls = primary.calls.clone();
        let engine = engine(primary, FakeRegistry::new("naver"));

        for input in [FOREIGN_SENTINEL, "[인식 실패] blurry.jpg", "", "   "] {
            assert_eq!(engine.enrich(input).await, (input.to_string(), false));
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registry_errors_degrade_to_miss() {
        let engine = engine(FakeRegistry::new("juso").failing(), FakeRegistry::new("naver").failing());
        assert_eq!(engine.enrich("신전로 221-8").await, ("신전로 221-8".to_string(), false));
    }

    #[tokio::test]
    async fn test_secondary_uses_same_variants() {
        let secondary = FakeRegistry::new("naver").hit("신전로", "전북특별자치도 김제시 신전로");
        let calls = secondary.calls.clone();
        let engine = engine(FakeRegistry::new("juso").failing(), secondary);

        assert_eq!(
            engine.enrich("신전로 221-8").await,
            ("전북특별자치도 김제시 신전로".to_string(), true)
        );
        assert_eq!(*calls.lock().unwrap(), vec!["신전로 221-8", "신전로"]);
    }

    #[tokio::test]
    async fn test_region_alias_and_suffix_reattached() {
        let primary = FakeRegistry::new("juso")
            .hit("전북특별자치도 김제시 신전로 221-8", "전북특별자치도 김제시 신전로 221-8");
        let engine = engine(primary, FakeRegistry::new("naver"));

        assert_eq!(
            engine.enrich("전북도 김제시 신전로, 221-8 행복상회").await,
            ("전북특별자치도 김제시 신전로 221-8 행복상회".to_string(), true)
        );
    }

    #[tokio::test]
    async fn test_detailed_address_merges_unit_into_building() {
        let primary = FakeRegistry::new("juso").hit(
            "서울 강남구 테헤란로 152",
            "서울특별시 강남구 테헤란로 152 (역삼동, 강남파이낸스센터)",
        );
        let engine = engine(primary, FakeRegistry::new("naver"));

        assert_eq!(
            engine.enrich("서울 강남구 테헤란로 152 3층").await,
            ("서울특별시 강남구 테헤란로 152 (역삼동, 강남파이낸스센터 3층)".to_string(), true)
        );
    }

    #[tokio::test]
    async fn test_detailed_address_road_only_retry() {
        let primary = FakeRegistry::new("juso").hit("지제동삭2로 177", "경기도 평택시 지제동삭2로 177");
        let calls = primary.calls.clone();
        let engine = engine(primary, FakeRegistry::new("naver"));

        assert_eq!(
            engine.enrich("경기 평택시지제동삭2로177 101동 1203호").await,
            ("경기도 평택시 지제동삭2로 177 (101동 1203호)".to_string(), true)
        );
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["경기 평택시지제동삭2로 177", "지제동삭2로 177"]
        );
    }

    #[tokio::test]
    async fn test_detailed_address_without_split_is_not_looked_up() {
        let primary = FakeRegistry::new("juso").hit("서울 강남구 역삼동 3층", "서울특별시 강남구 역삼동");
        let secondary = FakeRegistry::new("naver").hit("서울 강남구 역삼동 3층", "서울특별시 강남구 역삼동");
        let primary_calls = primary.calls.clone();
        let secondary_calls = secondary.calls.clone();
        let engine = engine(primary, secondary);

        let input = "서울 강남구 역삼동 3층";
        assert_eq!(engine.enrich(input).await, (input.to_string(), false));
        assert!(primary_calls.lock().unwrap().is_empty());
        assert!(secondary_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detailed_address_miss_is_invalid() {
        let secondary = FakeRegistry::new("naver");
        let calls = secondary.calls.clone();
        let engine = engine(FakeRegistry::new("juso"), secondary);

        let input = "서울 강남구 테헤란로 152 래미안아파트 101동 1203호";
        assert_eq!(engine.enrich(input).await, (input.to_string(), false));
        assert!(calls.lock().unwrap().is_empty());
    }
}
