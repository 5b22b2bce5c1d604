//! Order field extraction from OCR text.

mod assembler;
pub mod lines;
pub mod rules;

pub use assembler::{ExtractionResult, OrderParser, OrderTextParser};
pub use lines::normalize_lines;
pub use rules::LineExtractor;
