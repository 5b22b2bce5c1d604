//! Order record data model.

use serde::{Deserialize, Serialize};

/// Placeholder used when content clearly comes from a non-Korean context
/// and no structured field could be recovered.
pub const FOREIGN_SENTINEL: &str = "외국인";

/// Prefix marking an address that could not be recognized at all.
pub const RECOGNITION_FAILURE_MARKER: &str = "[인식 실패]";

/// One contact record extracted from an order slip.
///
/// Field order is the downstream column order and is kept stable in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Recipient name, possibly empty or [`FOREIGN_SENTINEL`].
    pub name: String,

    /// Address; never null, empty or a sentinel when nothing was found.
    pub address: String,

    /// Mobile number as 10-11 ASCII digits.
    #[serde(default)]
    pub phone: Option<String>,

    /// True only once a registry has confirmed the address.
    #[serde(default = "default_address_valid")]
    pub address_valid: bool,
}

fn default_address_valid() -> bool {
    true
}

impl OrderRecord {
    /// Create a record with a provisionally valid address.
    pub fn new(name: impl Into<String>, address: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone,
            address_valid: true,
        }
    }

    /// In-band record for an input that could not be processed.
    pub fn failed(source: &str, message: &str) -> Self {
        Self {
            name: format!("ERROR: {}", source),
            address: format!("processing failed: {}", message),
            phone: None,
            address_valid: false,
        }
    }

    /// Fill in the phone number when extraction found none.
    pub fn with_default_phone(mut self, default_phone: &str) -> Self {
        let missing = self.phone.as_deref().is_none_or(|p| p.trim().is_empty());
        if missing && !default_phone.is_empty() {
            self.phone = Some(default_phone.to_string());
        }
        self
    }

    /// Whether this record came from a failed unit.
    pub fn is_error(&self) -> bool {
        self.name.starts_with("ERROR: ")
    }
}

/// Phone number and the index of the line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneResult {
    /// 10-11 digits, or empty when nothing was found.
    pub phone: String,
    /// Source line index, -1 when nothing was found.
    pub line_index: i32,
}

impl PhoneResult {
    pub fn new(phone: impl Into<String>, line_index: usize) -> Self {
        Self {
            phone: phone.into(),
            line_index: line_index as i32,
        }
    }

    /// The "nothing found" sentinel.
    pub fn empty() -> Self {
        Self {
            phone: String::new(),
            line_index: -1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_empty()
    }

    /// Line index when known.
    pub fn line(&self) -> Option<usize> {
        usize::try_from(self.line_index).ok()
    }
}

/// Serialize records for the downstream spreadsheet step.
pub fn records_to_json(records: &[OrderRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Parse records produced by [`records_to_json`].
pub fn records_from_json(json: &str) -> Result<Vec<OrderRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_order() {
        let record = OrderRecord::new("John Smith", "서울특별시 강남구 테헤란로 152", Some("01012345678".into()));
        let json = records_to_json(std::slice::from_ref(&record)).unwrap();

        assert_eq!(
            json,
            r#"[{"name":"John Smith","address":"서울특별시 강남구 테헤란로 152","phone":"01012345678","addressValid":true}]"#
        );
        assert_eq!(records_from_json(&json).unwrap(), vec![record]);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let records = records_from_json(r#"[{"name":"A","address":"B"}]"#).unwrap();
        assert_eq!(records[0].phone, None);
        assert!(records[0].address_valid);
    }

    #[test]
    fn test_default_phone() {
        let record = OrderRecord::new("A", "B", None).with_default_phone("01086100102");
        assert_eq!(record.phone.as_deref(), Some("01086100102"));

        let record = OrderRecord::new("A", "B", Some("01099998888".into()))
            .with_default_phone("01086100102");
        assert_eq!(record.phone.as_deref(), Some("01099998888"));
    }

    #[test]
    fn test_failed_record() {
        let record = OrderRecord::failed("slip.png", "no text detected");
        assert_eq!(record.name, "ERROR: slip.png");
        assert_eq!(record.address, "processing failed: no text detected");
        assert!(!record.address_valid);
        assert!(record.is_error());
    }

    #[test]
    fn test_phone_result_sentinel() {
        let empty = PhoneResult::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.line_index, -1);
        assert_eq!(empty.line(), None);
        assert_eq!(PhoneResult::new("01012345678", 2).line(), Some(2));
    }
}
