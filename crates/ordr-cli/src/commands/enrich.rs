//! Enrich command - resolve one address.

use clap::Args;
use serde_json::json;

use ordr_core::AddressEnrichmentEngine;

use super::load_config;

/// Arguments for the enrich command.
#[derive(Args)]
pub struct EnrichArgs {
    /// Address as extracted from a slip
    #[arg(required = true)]
    address: String,
}

pub async fn run(args: EnrichArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let engine = AddressEnrichmentEngine::from_config(&config.registry)?;

    let (address, valid) = engine.enrich(&args.address).await;
    let output = json!({
        "input": args.address,
        "address": address,
        "addressValid": valid,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
