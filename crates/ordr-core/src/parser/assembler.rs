//! Order record assembly from raw OCR text.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::order::{FOREIGN_SENTINEL, OrderRecord};

use super::lines::normalize_lines;
use super::rules::{
    AddressExtractor, LineExtractor, NameExtractor, PhoneExtractor, patterns::contains_hangul,
};

/// Result of order extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record, address not yet enriched.
    pub record: OrderRecord,
    /// Normalized lines the extractors worked on.
    pub lines: Vec<String>,
    /// Line holding the phone number, if any.
    pub phone_line_index: Option<usize>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for order text parsing.
pub trait OrderParser {
    /// Parse one order slip's OCR text. Never fails; unrecognized content
    /// yields empty fields or sentinels.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Rule-based parser running the phone, address and name extractors.
pub struct OrderTextParser {
    phone: PhoneExtractor,
    address: AddressExtractor,
    name: NameExtractor,
}

impl OrderTextParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            phone: PhoneExtractor::new(),
            address: AddressExtractor::new(),
            name: NameExtractor::new(),
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_name_extractor(
            NameExtractor::new()
                .with_search_radius(config.name_search_radius)
                .with_top_block_lines(config.top_block_lines),
        )
    }

    /// Replace the name extractor.
    pub fn with_name_extractor(mut self, name: NameExtractor) -> Self {
        self.name = name;
        self
    }

    /// Korean lines joined, or the foreign sentinel when there are none.
    fn fallback_address(lines: &[String]) -> String {
        let korean: Vec<&str> = lines
            .iter()
            .filter(|l| contains_hangul(l))
            .map(String::as_str)
            .collect();

        if korean.is_empty() {
            FOREIGN_SENTINEL.to_string()
        } else {
            korean.join(" ")
        }
    }
}

impl Default for OrderTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderParser for OrderTextParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let lines = normalize_lines(text);
        info!("Parsing order from {} lines of text", lines.len());

        let phone = self.phone.extract(&lines);
        if phone.is_empty() {
            warnings.push("Could not extract phone number".to_string());
        }

        let mut address = self.address.extract(&lines);
        let name = self.name.extract(&lines, &address, phone.line());
        if name.is_empty() {
            warnings.push("Could not extract name".to_string());
        }

        if address.is_empty() {
            warnings.push("Could not extract address, using fallback".to_string());
            address = Self::fallback_address(&lines);
        }

        debug!("Extracted name={:?} address={:?} phone={:?}", name, address, phone.phone);

        let phone_line_index = phone.line();
        let phone = (!phone.is_empty()).then_some(phone.phone);

        ExtractionResult {
            record: OrderRecord::new(name, address, phone),
            lines,
            phone_line_index,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_street_sign_slip() {
        let text = "서울특별시 강남구 테헤란로\n152\n010-1234-5678\nJohn Smith\n";
        let result = OrderTextParser::new().parse(text);

        assert_eq!(
            result.record,
            OrderRecord::new(
                "John Smith",
                "서울특별시 강남구 테헤란로 152",
                Some("01012345678".to_string())
            )
        );
        assert_eq!(result.phone_line_index, Some(2));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_without_phone() {
        let result = OrderTextParser::new().parse("대송4길\n80\nAnyeong");

        assert_eq!(result.record.address, "대송4길 80");
        assert_eq!(result.record.name, "");
        assert_eq!(result.record.phone, None);
        assert!(result.record.address_valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_fallback_joins_korean_lines() {
        let result = OrderTextParser::new().parse("안녕하세요\nHi\n감사합니다");
        assert_eq!(result.record.address, "안녕하세요 감사합니다");
    }

    #[test]
    fn test_fallback_foreign_sentinel() {
        let result = OrderTextParser::new().parse("สวัสดีค่ะ\nขอบคุณ");
        assert_eq!(result.record.address, FOREIGN_SENTINEL);
        assert_eq!(result.record.name, FOREIGN_SENTINEL);
    }

    #[test]
    fn test_empty_text() {
        let result = OrderTextParser::new().parse("");
        assert_eq!(result.record.address, FOREIGN_SENTINEL);
        assert_eq!(result.record.name, "");
        assert!(result.lines.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            name_search_radius: 1,
            top_block_lines: 5,
        };
        let text = "reply: Kanya\n1\n2\n3\n4\nx\n010-2222-3333\ny\nz\nto: Malee!";

        assert_eq!(OrderTextParser::new().parse(text).record.name, "Malee");
        // nothing within one line of the phone, first candidate wins
        assert_eq!(OrderTextParser::from_config(&config).parse(text).record.name, "Kanya");
    }
}
