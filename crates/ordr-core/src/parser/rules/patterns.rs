//! Common regex patterns and script predicates for order-slip extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Korean mobile numbers: grouped with dash/space, or one digit run
    pub static ref PHONE_GROUPED: Regex = Regex::new(
        r"01[016789][-\s]?[0-9]{3,4}[-\s]?[0-9]{4}"
    ).unwrap();

    pub static ref PHONE_CONTIGUOUS: Regex = Regex::new(
        r"01[016789][0-9]{7,8}"
    ).unwrap();

    // Tokens that typically close an address fragment
    pub static ref ADDRESS_SUFFIX: Regex = Regex::new(
        r"[가-힣][시군구읍면동리로길]|[가-힣][0-9]+[로길]|[0-9]+[호층]|번지|아파트|빌라|오피스텔|APT"
    ).unwrap();

    // Road name, optionally followed by a building number
    pub static ref ROAD_NAME: Regex = Regex::new(
        r"[가-힣]{2,}\s*[0-9]*(?:번)?[로길](?:\s*[0-9]{1,4}(?:-[0-9]{1,4})?)?(?:$|\s|,)"
    ).unwrap();

    // Road name glued to its building number ("지제동삭2로177")
    pub static ref TIGHT_ROAD_NUMBER: Regex = Regex::new(
        r"[가-힣]+[0-9]*(?:로|길)[0-9]{1,4}(?:-[0-9]{1,4})?"
    ).unwrap();

    // Road name + building number with optional spacing, captured separately
    pub static ref ROAD_WITH_NUMBER: Regex = Regex::new(
        r"([가-힣]+[0-9]*[로길])\s*([0-9]{1,4}(?:-[0-9]{1,4})?)"
    ).unwrap();

    // A whole line that is only a road name (street sign photographed directly)
    pub static ref PURE_ROAD_NAME: Regex = Regex::new(
        r"^[a-zA-Z가-힣\s]*[가-힣]{2,}\s*[0-9]*(?:번)?[로길]$"
    ).unwrap();

    // Short line carrying a building number, noise allowed
    pub static ref NUMBER_LINE: Regex = Regex::new(
        r"^.*\b[0-9]{1,4}(?:-[0-9]{1,4})?\b.*$"
    ).unwrap();

    pub static ref BUILDING_NUMBER: Regex = Regex::new(
        r"[0-9]{1,4}(?:-[0-9]{1,4})?"
    ).unwrap();

    // Lot-number address (neighborhood + lot)
    pub static ref JIBUN: Regex = Regex::new(
        r"[가-힣]{2,}(?:동|읍|면|리)\s*[0-9]{1,5}(?:-[0-9]{1,5})?"
    ).unwrap();

    // Floor / room / block qualifiers
    pub static ref UNIT_DETAIL: Regex = Regex::new(
        r"[0-9]+[호층]|[0-9]+동\s*[0-9]+호|[0-9]+BL|[0-9]+블록"
    ).unwrap();

    pub static ref UNIT_MARKER: Regex = Regex::new(r"[호동층]").unwrap();

    // Room number OCR glued in front of a phone number ("1077 01012345678")
    pub static ref UNIT_BEFORE_PHONE: Regex = Regex::new(
        r"^([0-9]{1,4})\s+01[016789][0-9]{7,8}$"
    ).unwrap();

    pub static ref PRICE_AMOUNT: Regex = Regex::new(r"[0-9]{1,3}(?:,[0-9]{3})+").unwrap();

    // Romanized street transliterations printed under Korean signs
    pub static ref ROMANIZED_STREET: Regex = Regex::new(
        r"(?i)beon-gil|-(?:ro|gil|daero|dong|myeon|eup|ri)\b"
    ).unwrap();

    // Names
    pub static ref TOP_BLOCK_NAME: Regex = Regex::new(
        r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+$"
    ).unwrap();

    pub static ref NAME_WITH_PHONE: Regex = Regex::new(
        r"([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*)\s*[0-9]{10,11}"
    ).unwrap();

    pub static ref LATIN_NAME_LINE: Regex = Regex::new(
        r"^[A-Za-z][A-Za-z\s]{1,30}$"
    ).unwrap();

    pub static ref SINGLE_NAME: Regex = Regex::new(
        r"\b([A-Z][a-z]{2,15})\b"
    ).unwrap();
}

/// Words OCR picks up from app chrome and chat UI that are never names.
pub const STOP_WORDS: &[&str] = &[
    "Intake", "Online", "Image", "Excel", "Error", "Anyeong", "Khaopan", "Messenger",
    "Facebook", "Message", "Send", "Photo", "Forwarded", "Active", "Reply", "Seen", "Today",
    "Yesterday", "Delivered", "Video", "Call", "Korea", "Address", "Phone", "Name",
];

/// Whether a word is on the noise stop-list.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Whether any whitespace-separated token is on the stop-list.
pub fn contains_stop_word(text: &str) -> bool {
    text.split_whitespace().any(is_stop_word)
}

/// Hangul syllable block.
pub fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(is_hangul)
}

pub fn contains_thai(text: &str) -> bool {
    text.chars().any(|c| ('\u{0E00}'..='\u{0E7F}').contains(&c))
}

/// Thai, Lao, Khmer or Myanmar script.
pub fn contains_foreign_script(text: &str) -> bool {
    text.chars().any(|c| {
        ('\u{0E00}'..='\u{0E7F}').contains(&c)
            || ('\u{0E80}'..='\u{0EFF}').contains(&c)
            || ('\u{1780}'..='\u{17FF}').contains(&c)
            || ('\u{1000}'..='\u{109F}').contains(&c)
    })
}

/// Prices and currency amounts from order chat.
pub fn is_currency_or_price_line(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    lower.contains("krw")
        || lower.contains('원')
        || lower.contains("usd")
        || lower.contains('₩')
        || PRICE_AMOUNT.is_match(line)
}

pub fn is_romanized_street(line: &str) -> bool {
    ROMANIZED_STREET.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_predicates() {
        assert!(contains_hangul("서울 123"));
        assert!(!contains_hangul("Seoul 123"));
        assert!(contains_thai("สวัสดี"));
        assert!(contains_foreign_script("ສະບາຍດີ"));
        assert!(contains_foreign_script("សួស្តី"));
        assert!(!contains_foreign_script("서울 John"));
    }

    #[test]
    fn test_currency_lines() {
        assert!(is_currency_or_price_line("35,000"));
        assert!(is_currency_or_price_line("Total 35000 KRW"));
        assert!(is_currency_or_price_line("3만원"));
        assert!(!is_currency_or_price_line("152"));
    }

    #[test]
    fn test_romanized_street() {
        assert!(is_romanized_street("Teheran-ro"));
        assert!(is_romanized_street("Daesong 4-gil"));
        assert!(is_romanized_street("Gangnam-daero 12"));
        assert!(!is_romanized_street("John Smith"));
        assert!(!is_romanized_street("Jean-Robert"));
    }

    #[test]
    fn test_stop_words() {
        assert!(is_stop_word("Anyeong"));
        assert!(contains_stop_word("Forwarded Message"));
        assert!(!contains_stop_word("John Smith"));
    }
}
