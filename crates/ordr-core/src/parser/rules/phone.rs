//! Korean mobile number extraction.

use regex::Regex;
use tracing::debug;

use super::LineExtractor;
use super::patterns::{PHONE_CONTIGUOUS, PHONE_GROUPED};
use crate::models::order::PhoneResult;

/// Mobile number extractor.
pub struct PhoneExtractor {
    patterns: [&'static Regex; 2],
}

impl PhoneExtractor {
    pub fn new() -> Self {
        Self {
            patterns: [&*PHONE_GROUPED, &*PHONE_CONTIGUOUS],
        }
    }

    /// First 10-11 digit mobile number in `text`, digits only.
    pub fn match_phone(&self, text: &str) -> Option<String> {
        for pattern in self.patterns {
            for m in pattern.find_iter(text) {
                let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
                if (10..=11).contains(&digits.len()) {
                    return Some(digits);
                }
            }
        }
        None
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor for PhoneExtractor {
    type Output = PhoneResult;

    fn extract(&self, lines: &[String]) -> PhoneResult {
        for (index, line) in lines.iter().enumerate() {
            if let Some(phone) = self.match_phone(line) {
                return PhoneResult::new(phone, index);
            }
        }

        // OCR sometimes splits a number across two lines ("010 8610" / "0102")
        for (index, pair) in lines.windows(2).enumerate() {
            let merged = format!("{} {}", pair[0], pair[1]);
            if let Some(phone) = self.match_phone(&merged) {
                debug!("Recovered phone number split across lines {} and {}", index, index + 1);
                return PhoneResult::new(phone, index);
            }
        }

        PhoneResult::empty()
    }
}

/// Extract a phone number from normalized lines.
pub fn extract_phone(lines: &[String]) -> PhoneResult {
    PhoneExtractor::new().extract(lines)
}
