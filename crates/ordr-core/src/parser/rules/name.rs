//! Recipient name extraction.
//!
//! Names on these slips are romanized (the senders are mostly foreign
//! customers), so every heuristic looks for Latin capitalized words and uses
//! the phone line position to pick among several candidates.

use std::collections::HashSet;

use tracing::debug;

use super::patterns::*;
use crate::models::order::FOREIGN_SENTINEL;

/// Single-word candidates need more than one repeated letter ("Aaa").
const MIN_WORD_DISTINCT_CHARS: usize = 2;

/// Candidate collected from a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameCandidate {
    name: String,
    line_index: usize,
    is_full_line: bool,
}

/// Name field extractor.
pub struct NameExtractor {
    search_radius: usize,
    top_block_lines: usize,
    min_distinct_chars: usize,
}

impl NameExtractor {
    pub fn new() -> Self {
        Self {
            search_radius: 4,
            top_block_lines: 5,
            min_distinct_chars: 3,
        }
    }

    /// Set how far from the phone line a name may sit.
    pub fn with_search_radius(mut self, radius: usize) -> Self {
        self.search_radius = radius;
        self
    }

    /// Set how many leading lines form the top of the block.
    pub fn with_top_block_lines(mut self, lines: usize) -> Self {
        self.top_block_lines = lines;
        self
    }

    /// Extract a name. `address` is excluded from the candidates and
    /// `phone_line` anchors the proximity search when known.
    pub fn extract(&self, lines: &[String], address: &str, phone_line: Option<usize>) -> String {
        if let Some(name) = self.top_block_full_name(lines, address) {
            debug!("Name from top of block: {}", name);
            return name;
        }

        if let Some(name) = name_next_to_phone(lines) {
            debug!("Name next to phone number: {}", name);
            return name;
        }

        let candidates = self.collect_candidates(lines, address, phone_line);
        let foreign = lines.iter().any(|l| contains_foreign_script(l));

        if candidates.is_empty() {
            return if foreign { FOREIGN_SENTINEL.to_string() } else { String::new() };
        }

        if let Some(phone_line) = phone_line {
            let nearest = candidates
                .iter()
                .filter(|c| c.line_index.abs_diff(phone_line) <= self.search_radius)
                .min_by_key(|c| (c.line_index.abs_diff(phone_line), !c.is_full_line));
            if let Some(candidate) = nearest {
                return candidate.name.clone();
            }
        }

        if let Some(candidate) = self.top_block_candidate(&candidates) {
            return candidate.name.clone();
        }
        if foreign {
            return FOREIGN_SENTINEL.to_string();
        }
        candidates[0].name.clone()
    }

    /// Two or more capitalized words at the top of the block.
    fn top_block_full_name(&self, lines: &[String], address: &str) -> Option<String> {
        lines
            .iter()
            .take(self.top_block_lines)
            .map(|l| l.trim())
            .filter(|l| !is_address_line(l, address))
            .find(|l| TOP_BLOCK_NAME.is_match(l) && !contains_stop_word(l))
            .map(str::to_string)
    }

    fn collect_candidates(
        &self,
        lines: &[String],
        address: &str,
        phone_line: Option<usize>,
    ) -> Vec<NameCandidate> {
        let mut candidates = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line = line.trim();
            if Some(index) == phone_line
                || is_address_line(line, address)
                || line.to_uppercase().contains("KRW")
                || is_romanized_street(line)
            {
                continue;
            }

            if LATIN_NAME_LINE.is_match(line)
                && !contains_stop_word(line)
                && distinct_letters(line) >= self.min_distinct_chars
            {
                candidates.push(NameCandidate {
                    name: line.to_string(),
                    line_index: index,
                    is_full_line: true,
                });
                continue;
            }

            // Rejected full lines still get a single-word chance ("Anyeong Kanya", "Bob")
            let partial = SINGLE_NAME
                .captures_iter(line)
                .map(|caps| caps[1].to_string())
                .find(|word| !is_stop_word(word) && distinct_letters(word) >= MIN_WORD_DISTINCT_CHARS);
            if let Some(name) = partial {
                candidates.push(NameCandidate {
                    name,
                    line_index: index,
                    is_full_line: false,
                });
            }
        }

        candidates
    }

    fn top_block_candidate<'a>(&self, candidates: &'a [NameCandidate]) -> Option<&'a NameCandidate> {
        candidates.iter().find(|c| {
            c.is_full_line
                && c.line_index < self.top_block_lines
                && c.name.split_whitespace().count() >= 2
        })
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a name from normalized lines with default settings.
pub fn extract_name(lines: &[String], address: &str, phone_line: Option<usize>) -> String {
    NameExtractor::new().extract(lines, address, phone_line)
}

/// "Somchai Jaidee 0812345678" style lines.
fn name_next_to_phone(lines: &[String]) -> Option<String> {
    lines.iter().find_map(|line| {
        let caps = NAME_WITH_PHONE.captures(line)?;
        let name = caps[1].trim();
        (!name.is_empty() && !contains_stop_word(name)).then(|| name.to_string())
    })
}

fn is_address_line(line: &str, address: &str) -> bool {
    !address.is_empty() && (line == address || address.contains(line))
}

fn distinct_letters(text: &str) -> usize {
    text.chars()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect::<HashSet<_>>()
        .len()
}
