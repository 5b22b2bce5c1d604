//! Rule-based field extractors for Korean order slips.

pub mod address;
pub mod name;
pub mod patterns;
pub mod phone;
pub mod region;

pub use address::{AddressExtractor, AddressStrategy, STRATEGIES, extract_address};
pub use name::{NameExtractor, extract_name};
pub use phone::{PhoneExtractor, extract_phone};
pub use region::{Region, contains_region_keyword};

/// Trait for extractors that consume the whole line sequence.
pub trait LineExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from normalized lines.
    fn extract(&self, lines: &[String]) -> Self::Output;
}
