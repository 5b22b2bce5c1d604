//! Bounded-concurrency batch processing.
//!
//! OCR calls and enrichment calls each pass through their own counting gate.
//! A failing unit becomes an in-band error record; results always come back
//! in input order with one record per input.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::enrich::AddressEnrichmentEngine;
use crate::error::OcrError;
use crate::models::config::OrdrConfig;
use crate::models::order::OrderRecord;
use crate::ocr::OcrProvider;
use crate::parser::{OrderParser, OrderTextParser};

/// One image to process.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// File name, used in error records.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Called once per finished unit.
pub type ProgressCallback = Arc<dyn Fn(&OrderRecord) + Send + Sync>;

/// Fans OCR and enrichment out over a batch.
pub struct BatchCoordinator {
    ocr: Arc<dyn OcrProvider>,
    enricher: Arc<AddressEnrichmentEngine>,
    parser: OrderTextParser,
    ocr_gate: Semaphore,
    enrich_gate: Semaphore,
    default_phone: String,
    progress: Option<ProgressCallback>,
}

impl BatchCoordinator {
    pub fn new(
        ocr: Arc<dyn OcrProvider>,
        enricher: Arc<AddressEnrichmentEngine>,
        config: &OrdrConfig,
    ) -> Self {
        Self {
            ocr,
            enricher,
            parser: OrderTextParser::from_config(&config.extraction),
            ocr_gate: Semaphore::new(config.batch.max_concurrent_ocr.max(1)),
            enrich_gate: Semaphore::new(config.batch.max_concurrent_enrichment.max(1)),
            default_phone: config.order.default_phone.clone(),
            progress: None,
        }
    }

    /// Report each finished unit, e.g. to drive a progress bar.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// OCR and parse one image.
    pub async fn extract_one(&self, image: &ImageInput) -> Result<OrderRecord, OcrError> {
        let text = {
            let _permit = self
                .ocr_gate
                .acquire()
                .await
                .map_err(|e| OcrError::Provider(e.to_string()))?;
            self.ocr.recognize(&image.bytes).await?
        };

        let result = self.parser.parse(&text);
        Ok(result.record.with_default_phone(&self.default_phone))
    }

    /// OCR and parse every image, at most `max_concurrent_ocr` calls at once.
    pub async fn extract_batch(&self, images: Vec<ImageInput>) -> Vec<OrderRecord> {
        let start = Instant::now();
        info!("Extracting {} images (max {} concurrent)", images.len(), self.ocr_gate.available_permits());

        let tasks = images.iter().map(|image| async move {
            let record = match self.extract_one(image).await {
                Ok(record) => record,
                Err(e) => {
                    error!("Image processing failed: {}: {}", image.name, e);
                    OrderRecord::failed(&image.name, &e.to_string())
                }
            };
            self.report(&record);
            record
        });
        let records = join_all(tasks).await;

        info!("Extracted {} records in {:?}", records.len(), start.elapsed());
        records
    }

    /// Enrich one record's address. Error records pass through unchanged.
    pub async fn enrich_record(&self, mut record: OrderRecord) -> OrderRecord {
        if record.is_error() {
            return record;
        }

        let _permit = self.enrich_gate.acquire().await.ok();
        let (address, valid) = self.enricher.enrich(&record.address).await;
        record.address = address;
        record.address_valid = valid;
        record
    }

    /// Enrich every record, at most `max_concurrent_enrichment` calls at once.
    pub async fn enrich_batch(&self, records: Vec<OrderRecord>) -> Vec<OrderRecord> {
        let start = Instant::now();
        info!("Enriching {} addresses", records.len());

        let records = join_all(records.into_iter().map(|r| self.enrich_record(r))).await;

        let valid = records.iter().filter(|r| r.address_valid).count();
        info!("Enriched {} addresses ({} confirmed) in {:?}", records.len(), valid, start.elapsed());
        records
    }

    /// Extraction followed by enrichment.
    pub async fn extract_and_enrich(&self, images: Vec<ImageInput>) -> Vec<OrderRecord> {
        let records = self.extract_batch(images).await;
        self.enrich_batch(records).await
    }

    fn report(&self, record: &OrderRecord) {
        if let Some(progress) = &self.progress {
            progress(record);
        }
    }
}
