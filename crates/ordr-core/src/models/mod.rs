//! Data models and configuration.

pub mod config;
pub mod order;

pub use config::OrdrConfig;
pub use order::{OrderRecord, PhoneResult, FOREIGN_SENTINEL, RECOGNITION_FAILURE_MARKER};
