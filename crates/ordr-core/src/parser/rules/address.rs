//! Korean address extraction.
//!
//! Five independent strategies are tried in a fixed priority order and the
//! first one that produces an address wins:
//!
//! 1. pure road name: a street sign photographed on its own, paired with a
//!    nearby building number line
//! 2. tight address: region keyword plus a road name glued to its number
//! 3. standard: region-keyword block over several lines
//! 4. combined road: any road-name line paired with a nearby number
//! 5. jibun: neighborhood + lot number

use std::ops::RangeInclusive;

use tracing::debug;

use super::LineExtractor;
use super::patterns::*;
use super::region::contains_region_keyword;

/// Uniform strategy signature: normalized lines in, address out.
pub type AddressStrategy = fn(&[String]) -> Option<String>;

/// Strategies in priority order.
pub const STRATEGIES: [(&str, AddressStrategy); 5] = [
    ("pure_road_name", extract_pure_road_name),
    ("tight_address", extract_tight_address),
    ("standard_address", extract_standard_address),
    ("combined_road", extract_combined_road_address),
    ("jibun", extract_jibun_address),
];

const FORWARD_WINDOW: RangeInclusive<usize> = 1..=3;
const BACKWARD_WINDOW: RangeInclusive<usize> = 1..=5;
const MAX_NUMBER_LINE_CHARS: usize = 15;

/// Address extractor.
pub struct AddressExtractor;

impl AddressExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor for AddressExtractor {
    type Output = String;

    fn extract(&self, lines: &[String]) -> String {
        // Thai chat content is never an address line here
        let clean: Vec<String> = lines.iter().filter(|l| !contains_thai(l)).cloned().collect();
        if clean.is_empty() {
            return String::new();
        }

        for (name, strategy) in STRATEGIES {
            if let Some(address) = strategy(&clean) {
                debug!("Address found by {} strategy: {}", name, address);
                return address;
            }
        }

        String::new()
    }
}

/// Extract an address from normalized lines.
pub fn extract_address(lines: &[String]) -> String {
    AddressExtractor::new().extract(lines)
}

/// A line that is only a road name, joined with a building number found
/// just below or above it.
pub fn extract_pure_road_name(lines: &[String]) -> Option<String> {
    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !PURE_ROAD_NAME.is_match(trimmed) || !contains_hangul(trimmed) {
            continue;
        }

        let number = find_number_near(lines, index, FORWARD_WINDOW, Direction::Forward, true)
            .or_else(|| find_number_near(lines, index, BACKWARD_WINDOW, Direction::Backward, true));
        if let Some(number) = number {
            return Some(format!("{} {}", trimmed, number));
        }
    }
    None
}

/// Region keyword plus a glued road name and number, extended with unit
/// detail lines that follow it.
pub fn extract_tight_address(lines: &[String]) -> Option<String> {
    let index = lines
        .iter()
        .position(|l| contains_region_keyword(l) && TIGHT_ROAD_NUMBER.is_match(l))?;

    let mut result = lines[index].clone();
    for next in lines.iter().skip(index + 1).take(3) {
        let next = next.trim();
        if next.is_empty() || contains_thai(next) || is_currency_or_price_line(next) {
            break;
        }
        if !UNIT_DETAIL.is_match(next) {
            break;
        }
        result.push(' ');
        result.push_str(next);
    }
    Some(result)
}

/// Region-keyword block spanning consecutive address-looking lines, or a
/// single line with Hangul, a digit and an address suffix.
pub fn extract_standard_address(lines: &[String]) -> Option<String> {
    let mut block: Vec<&str> = Vec::new();
    let mut last_index = 0;

    for (index, line) in lines.iter().enumerate() {
        let accepted = if contains_region_keyword(line) {
            true
        } else {
            !block.is_empty() && contains_hangul(line) && ADDRESS_SUFFIX.is_match(line)
        };

        if accepted {
            block.push(line);
            last_index = index;
        } else if !block.is_empty() {
            break;
        }
    }

    if !block.is_empty() {
        let mut address = block.join(" ").trim().to_string();
        if let Some(unit) = recover_unit_number(lines, last_index, &address) {
            debug!("Recovered unit {} from line before phone number", unit);
            address.push(' ');
            address.push_str(&unit);
        }
        return Some(address);
    }

    lines
        .iter()
        .find(|l| {
            contains_hangul(l) && l.chars().any(|c| c.is_ascii_digit()) && ADDRESS_SUFFIX.is_match(l)
        })
        .cloned()
}

/// First road-name line, joined with a number found near it when possible.
pub fn extract_combined_road_address(lines: &[String]) -> Option<String> {
    let index = lines
        .iter()
        .position(|l| ROAD_NAME.is_match(l) && contains_hangul(l))?;
    let line = &lines[index];

    let number = find_number_near(lines, index, FORWARD_WINDOW, Direction::Forward, false)
        .or_else(|| find_number_near(lines, index, BACKWARD_WINDOW, Direction::Backward, false));

    Some(match number {
        Some(number) => format!("{} {}", line, number),
        None => line.clone(),
    })
}

/// First neighborhood + lot number line.
pub fn extract_jibun_address(lines: &[String]) -> Option<String> {
    lines.iter().find(|l| JIBUN.is_match(l)).cloned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Look for a short building-number line around `index`.
///
/// Forward search stops at the first line that is neither skippable noise
/// nor a number. A backward hit on a Hangul line returns the whole line when
/// `full_line` is set, since it usually carries the lot or district too.
fn find_number_near(
    lines: &[String],
    index: usize,
    window: RangeInclusive<usize>,
    direction: Direction,
    full_line: bool,
) -> Option<String> {
    for step in window {
        let target = match direction {
            Direction::Forward => index + step,
            Direction::Backward => index.checked_sub(step)?,
        };
        let line = lines.get(target)?.trim();

        if line.is_empty()
            || is_romanized_street(line)
            || line.contains("우편번호")
            || is_currency_or_price_line(line)
            || is_phone_line(line)
        {
            continue;
        }

        if line.chars().count() < MAX_NUMBER_LINE_CHARS && NUMBER_LINE.is_match(line) {
            if let Some(m) = BUILDING_NUMBER.find_iter(line).last() {
                return Some(if full_line && direction == Direction::Backward && contains_hangul(line) {
                    line.to_string()
                } else {
                    m.as_str().to_string()
                });
            }
        }

        if direction == Direction::Forward {
            break;
        }
    }
    None
}

fn is_phone_line(line: &str) -> bool {
    PHONE_GROUPED.is_match(line) || PHONE_CONTIGUOUS.is_match(line)
}

/// OCR often glues a room number in front of the phone number on the line
/// right after the address ("1077 01012345678"), misreading the trailing
/// unit glyph as a digit. Best effort: drop the last digit and call it a room.
fn recover_unit_number(lines: &[String], last_index: usize, address: &str) -> Option<String> {
    let next = lines.get(last_index + 1)?.trim();
    let caps = UNIT_BEFORE_PHONE.captures(next)?;
    if UNIT_MARKER.is_match(address) {
        return None;
    }

    let raw = &caps[1];
    let unit = if raw.len() >= 2 { &raw[..raw.len() - 1] } else { raw };
    Some(format!("{}호", unit))
}
