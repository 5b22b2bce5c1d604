//! Registry query preparation.
//!
//! OCR'd addresses rarely match a registry keyword as-is: province names are
//! abbreviated, road names run into building numbers, shop names and unit
//! numbers trail the searchable part. These helpers turn one extracted
//! address into an ordered list of queries plus the text to re-attach.

use lazy_static::lazy_static;
use regex::Regex;

use crate::parser::rules::patterns::ROAD_WITH_NUMBER;
use crate::parser::rules::region::contains_region_keyword;

lazy_static! {
    static ref ROAD_NUMBER_GLUED: Regex = Regex::new(
        r"([가-힣][0-9]*(?:로|길))([0-9])"
    ).unwrap();

    // Greedy: everything up to the last administrative-division marker
    static ref ADMIN_PREFIX: Regex = Regex::new(r".*[시군구면읍]").unwrap();

    static ref TRAILING_NUMBER: Regex = Regex::new(
        r"\s+[0-9]+(-[0-9]+)?\s*$"
    ).unwrap();

    static ref LEADING_NUMBER: Regex = Regex::new(
        r"^([0-9]+(?:-[0-9]+)?)\s*(.*)$"
    ).unwrap();

    static ref DETAIL_UNIT: Regex = Regex::new(
        r"[0-9]+호|[0-9]+동\s*[0-9]|[0-9]+층"
    ).unwrap();

    static ref BUILDING_NAME: Regex = Regex::new(
        r"[가-힣A-Za-z0-9]+(?:아파트|빌라|오피스텔|맨션|타운|파크|하우스|APT|apt)"
    ).unwrap();

    static ref LEADING_BUILDING_NAME: Regex = Regex::new(
        r"^[가-힣A-Za-z0-9]+(?:아파트|빌라|오피스텔|맨션|타운|파크|하우스|APT|apt)\s*"
    ).unwrap();

    static ref TRAILING_UNIT: Regex = Regex::new(
        r"\s+[0-9]+동\s+[0-9]+호|\s+[0-9]+호\s*$"
    ).unwrap();

    static ref TRAILING_PAREN: Regex = Regex::new(r"\(([^)]+)\)\s*$").unwrap();
}

/// Short province forms OCR and customers produce, mapped to the names the
/// registries index. Each rule is `(needle, unless followed by, replacement)`.
const REGION_ALIASES: &[(&str, &str, &str)] = &[
    ("전북도", "특별", "전북특별자치도 "),
    ("전라북도 ", "", "전북특별자치도 "),
    ("전남도", "라", "전라남도 "),
    ("경남도", "상", "경상남도 "),
    ("경북도", "상", "경상북도 "),
    ("충북도", "청", "충청북도 "),
    ("충남도", "청", "충청남도 "),
    ("강원도 ", "", "강원특별자치도 "),
];

/// One registry query and the text to append to whatever it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryVariant {
    pub query: String,
    pub suffix: String,
}

impl QueryVariant {
    pub fn new(query: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            suffix: suffix.into(),
        }
    }

    /// Attach the suffix to a resolved registry address.
    pub fn resolve(&self, registry_address: &str) -> String {
        if self.suffix.trim().is_empty() {
            registry_address.to_string()
        } else {
            format!("{} {}", registry_address, self.suffix)
        }
    }
}

/// Replace abbreviated province names with their canonical form.
pub fn normalize_region_name(address: &str) -> String {
    let mut text = address.to_string();
    for (needle, guard, replacement) in REGION_ALIASES {
        text = replace_unless_followed_by(&text, needle, guard, replacement);
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace every `needle` not immediately followed by `guard`. An empty
/// guard replaces unconditionally.
fn replace_unless_followed_by(text: &str, needle: &str, guard: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for (start, _) in text.match_indices(needle) {
        let end = start + needle.len();
        if !guard.is_empty() && text[end..].starts_with(guard) {
            continue;
        }
        out.push_str(&text[last..start]);
        out.push_str(replacement);
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

/// Insert the missing space between a road name and its building number.
pub fn normalize_road_spacing(address: &str) -> String {
    ROAD_NUMBER_GLUED.replace_all(address, "${1} ${2}").into_owned()
}

/// Road name + building number only, with any administrative prefix glued
/// to the road name removed ("평택시지제동삭2로 177" -> "지제동삭2로 177").
pub fn extract_road_name_query(address: &str) -> Option<String> {
    let caps = ROAD_WITH_NUMBER.captures(address)?;
    let mut road = &caps[1];
    let number = &caps[2];

    if let Some(prefix) = ADMIN_PREFIX.find(road) {
        let rest = &road[prefix.end()..];
        if rest.chars().count() >= 2 {
            road = rest;
        }
    }

    Some(format!("{} {}", road, number))
}

/// Drop a bare trailing number ("신전로 221-8" -> "신전로").
pub fn strip_trailing_number(address: &str) -> String {
    TRAILING_NUMBER.replace(address, "").trim().to_string()
}

/// Split "road, 12 shop name" into ("road 12", "shop name"). Addresses
/// without a comma come back unchanged with an empty suffix.
pub fn extract_suffix(address: &str) -> (String, String) {
    let Some((before, after)) = address.split_once(',') else {
        return (address.to_string(), String::new());
    };
    let before = before.trim();
    let after = after.trim();

    match LEADING_NUMBER.captures(after) {
        Some(caps) => (format!("{} {}", before, &caps[1]), caps[2].trim().to_string()),
        None => (before.to_string(), after.to_string()),
    }
}

/// Ordered, de-duplicated query variants for an already region-normalized
/// address.
pub fn build_variants(normalized: &str) -> Vec<QueryVariant> {
    let (core, suffix) = extract_suffix(normalized);
    let candidates = [
        QueryVariant::new(normalized, ""),
        QueryVariant::new(strip_trailing_number(normalized), ""),
        QueryVariant::new(core, suffix),
        QueryVariant::new(extract_road_name_query(normalized).unwrap_or_default(), ""),
    ];

    let mut variants: Vec<QueryVariant> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.query.trim().is_empty() || variants.iter().any(|v| v.query == candidate.query) {
            continue;
        }
        variants.push(candidate);
    }
    variants
}

/// Region keyword plus a room, building or floor number.
pub fn is_detailed_address(address: &str) -> bool {
    contains_region_keyword(address) && DETAIL_UNIT.is_match(address)
}

/// Split a detailed address into the searchable base and the unit detail.
/// Returns `None` when no boundary is found.
pub fn split_building_detail(address: &str) -> Option<(String, String)> {
    if let Some(m) = BUILDING_NAME.find(address) {
        let base = address[..m.start()].trim();
        if !base.is_empty() {
            return Some((base.to_string(), address[m.start()..].trim().to_string()));
        }
    }

    if let Some(m) = ROAD_WITH_NUMBER.find(address) {
        let remaining = address[m.end()..].trim();
        if !remaining.is_empty() && DETAIL_UNIT.is_match(remaining) {
            return Some((address[..m.end()].trim().to_string(), remaining.to_string()));
        }
    }

    if let Some(m) = TRAILING_UNIT.find(address) {
        let base = address[..m.start()].trim();
        if !base.is_empty() {
            return Some((base.to_string(), address[m.start()..].trim().to_string()));
        }
    }

    None
}

/// Re-attach unit detail to a registry address, merging it into a trailing
/// building-name parenthesis when the registry supplied one.
pub fn combine_with_detail(road_addr: &str, detail: &str) -> String {
    if detail.trim().is_empty() {
        return road_addr.to_string();
    }

    let unit_info = LEADING_BUILDING_NAME.replace(detail, "");
    let unit_info = unit_info.trim();

    if let Some(caps) = TRAILING_PAREN.captures(road_addr) {
        if !unit_info.is_empty() {
            let start = caps.get(0).map_or(road_addr.len(), |m| m.start());
            return format!("{}({} {})", &road_addr[..start], &caps[1], unit_info);
        }
    }

    format!("{} ({})", road_addr, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_region_name() {
        assert_eq!(normalize_region_name("전북도김제시 신전로"), "전북특별자치도 김제시 신전로");
        assert_eq!(normalize_region_name("전북특별자치도 김제시"), "전북특별자치도 김제시");
        assert_eq!(normalize_region_name("전라북도 김제시"), "전북특별자치도 김제시");
        assert_eq!(normalize_region_name("경남도 창원시"), "경상남도 창원시");
        assert_eq!(normalize_region_name("충북도 청주시"), "충청북도 청주시");
        assert_eq!(normalize_region_name("충북도청"), "충북도청");
        assert_eq!(normalize_region_name("강원도 춘천시"), "강원특별자치도 춘천시");
        assert_eq!(normalize_region_name(" 서울  강남구 "), "서울 강남구");
    }

    #[test]
    fn test_replace_guard() {
        assert_eq!(replace_unless_followed_by("경남도상경남도", "경남도", "상", "X"), "경남도상X");
        assert_eq!(replace_unless_followed_by("abab", "ab", "", "c"), "cc");
    }

    #[test]
    fn test_normalize_road_spacing() {
        assert_eq!(normalize_road_spacing("평택시지제동삭2로177"), "평택시지제동삭2로 177");
        assert_eq!(normalize_road_spacing("신전로221-8"), "신전로 221-8");
        assert_eq!(normalize_road_spacing("신전로 221-8"), "신전로 221-8");
    }

    #[test]
    fn test_extract_road_name_query() {
        assert_eq!(
            extract_road_name_query("경기 평택시지제동삭2로 177").as_deref(),
            Some("지제동삭2로 177")
        );
        assert_eq!(
            extract_road_name_query("김제시 신전로 221-8 2층").as_deref(),
            Some("신전로 221-8")
        );
        assert_eq!(extract_road_name_query("John Smith"), None);
    }

    #[test]
    fn test_admin_prefix_kept_when_remainder_too_short() {
        // "시로" would leave a single-character road name
        assert_eq!(extract_road_name_query("시로 12").as_deref(), Some("시로 12"));
    }

    #[test]
    fn test_strip_trailing_number() {
        assert_eq!(strip_trailing_number("김제시 신전로 221-8"), "김제시 신전로");
        assert_eq!(strip_trailing_number("알수없는주소123"), "알수없는주소123");
    }

    #[test]
    fn test_extract_suffix() {
        assert_eq!(
            extract_suffix("김제시 신전로, 221-8 행복상회"),
            ("김제시 신전로 221-8".to_string(), "행복상회".to_string())
        );
        assert_eq!(
            extract_suffix("김제시 신전로 221-8, 행복상회"),
            ("김제시 신전로 221-8".to_string(), "행복상회".to_string())
        );
        assert_eq!(extract_suffix("신전로 221-8"), ("신전로 221-8".to_string(), String::new()));
    }

    #[test]
    fn test_build_variants() {
        let variants = build_variants("김제시 신전로, 221-8 행복상회");
        assert_eq!(
            variants,
            vec![
                QueryVariant::new("김제시 신전로, 221-8 행복상회", ""),
                QueryVariant::new("김제시 신전로 221-8", "행복상회"),
            ]
        );
    }

    #[test]
    fn test_build_variants_deduplicates() {
        let variants = build_variants("알수없는주소123");
        assert_eq!(variants, vec![QueryVariant::new("알수없는주소123", "")]);

        let variants = build_variants("신전로 221-8");
        assert_eq!(
            variants,
            vec![QueryVariant::new("신전로 221-8", ""), QueryVariant::new("신전로", "")]
        );
    }

    #[test]
    fn test_is_detailed_address() {
        assert!(is_detailed_address("서울 강남구 테헤란로 152 3층"));
        assert!(is_detailed_address("경기 평택시 지제동삭2로 177 101동 1203호"));
        assert!(!is_detailed_address("신전로 221-8 3층"));
        assert!(!is_detailed_address("서울 강남구 테헤란로 152"));
    }

    #[test]
    fn test_split_building_detail() {
        assert_eq!(
            split_building_detail("서울 강남구 테헤란로 152 래미안아파트 101동 1203호"),
            Some(("서울 강남구 테헤란로 152".to_string(), "래미안아파트 101동 1203호".to_string()))
        );
        assert_eq!(
            split_building_detail("서울 강남구 테헤란로 152 3층"),
            Some(("서울 강남구 테헤란로 152".to_string(), "3층".to_string()))
        );
        assert_eq!(
            split_building_detail("서울 강남구 역삼동 101동 1203호"),
            Some(("서울 강남구 역삼동".to_string(), "101동 1203호".to_string()))
        );
        assert_eq!(split_building_detail("서울 강남구 테헤란로 152"), None);
    }

    #[test]
    fn test_combine_with_detail() {
        assert_eq!(
            combine_with_detail("서울특별시 강남구 테헤란로 152 (역삼동, 강남파이낸스센터)", "3층"),
            "서울특별시 강남구 테헤란로 152 (역삼동, 강남파이낸스센터 3층)"
        );
        assert_eq!(
            combine_with_detail("서울특별시 강남구 테헤란로 152", "래미안아파트 101동 1203호"),
            "서울특별시 강남구 테헤란로 152 (래미안아파트 101동 1203호)"
        );
        assert_eq!(combine_with_detail("서울특별시 강남구 테헤란로 152", ""), "서울특별시 강남구 테헤란로 152");
    }
}
