//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod enrich;
pub mod export;
pub mod parse;
pub mod process;
pub mod usage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use ordr_core::models::config::OrdrConfig;
use ordr_core::{AddressEnrichmentEngine, BatchCoordinator, UsageTracker, VisionClient};

/// `<config_dir>/ordr/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ordr")
        .join("config.json")
}

/// Explicit `--config` file, else the default file if present, else
/// defaults; environment secrets win over both.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<OrdrConfig> {
    let config = match config_path {
        Some(path) => OrdrConfig::from_file(Path::new(path))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                OrdrConfig::from_file(&default_path)?
            } else {
                OrdrConfig::default()
            }
        }
    };

    Ok(config.apply_env())
}

/// Vision gateway, both registries and the usage counter wired into one
/// coordinator.
pub fn build_coordinator(
    config: &OrdrConfig,
) -> anyhow::Result<(BatchCoordinator, Arc<UsageTracker>)> {
    let usage = Arc::new(UsageTracker::load(&config.usage));
    let ocr = VisionClient::new(&config.ocr)?.with_usage_tracker(usage.clone());

    if !ocr.is_configured() {
        anyhow::bail!(
            "Vision API key is not configured.\n\n\
             Set GOOGLE_CLOUD_API_KEY or run 'ordr config set ocr.api_key <key>'."
        );
    }

    let enricher = AddressEnrichmentEngine::from_config(&config.registry)?;
    let coordinator = BatchCoordinator::new(Arc::new(ocr), Arc::new(enricher), config);
    Ok((coordinator, usage))
}
