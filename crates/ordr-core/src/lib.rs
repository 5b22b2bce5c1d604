//! Core library for turning photographed order slips into contact records.
//!
//! This crate provides:
//! - Line normalization and rule-based phone, address and name extraction
//! - Address enrichment against the road-address and geocoding registries
//! - A Google Cloud Vision OCR gateway with retry and usage counting
//! - Bounded-concurrency batch processing with per-image failure isolation

pub mod batch;
pub mod enrich;
pub mod error;
pub mod models;
pub mod ocr;
pub mod parser;
pub mod usage;

pub use batch::{BatchCoordinator, ImageInput};
pub use enrich::{AddressEnrichmentEngine, AddressRegistry, RegistrySearchResult};
pub use error::{OcrError, OrdrError, RegistryError, Result};
pub use models::config::OrdrConfig;
pub use models::order::{FOREIGN_SENTINEL, OrderRecord, PhoneResult, RECOGNITION_FAILURE_MARKER};
pub use ocr::{OcrProvider, VisionClient};
pub use parser::{ExtractionResult, OrderParser, OrderTextParser, normalize_lines};
pub use usage::{UsageInfo, UsageTracker};
