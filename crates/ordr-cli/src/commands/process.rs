//! Process command - extract one record from a single order photo.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ordr_core::ImageInput;

use super::{build_coordinator, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input image
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip address enrichment
    #[arg(long)]
    no_enrich: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !super::batch::is_supported_image(&extension) {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    info!("Processing file: {}", args.input.display());
    let (coordinator, usage) = build_coordinator(&config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    pb.set_message("Running OCR...");
    let name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let image = ImageInput::new(name, fs::read(&args.input)?);
    let record = coordinator.extract_one(&image).await;
    let mut record = match record {
        Ok(record) => record,
        Err(e) => {
            pb.finish_and_clear();
            anyhow::bail!("OCR failed: {}", e);
        }
    };

    if !args.no_enrich {
        pb.set_message("Resolving address...");
        record = coordinator.enrich_record(record).await;
    }

    pb.finish_and_clear();
    usage.flush();

    let output = serde_json::to_string_pretty(&record)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!("{} Output written to {}", style("✓").green(), output_path.display());
    } else {
        println!("{}", output);
    }

    if !record.address_valid && !args.no_enrich {
        eprintln!(
            "{} Address could not be confirmed by any registry",
            style("!").yellow()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
