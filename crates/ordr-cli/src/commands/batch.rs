//! Batch command - every order photo matching a glob pattern.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use ordr_core::models::order::records_to_json;
use ordr_core::{ImageInput, OrderRecord};

use super::export::write_csv;
use super::{build_coordinator, load_config};

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "bmp", "tiff", "tif", "gif"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern, e.g. "photos/*.jpg"
    #[arg(required = true)]
    input: String,

    /// Records JSON output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the spreadsheet CSV layout
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip address enrichment
    #[arg(long)]
    no_enrich: bool,
}

pub(crate) fn is_supported_image(extension: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&extension)
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            is_supported_image(&ext.to_lowercase())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching images found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} images to process", style("ℹ").blue(), files.len());

    let mut images = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        match fs::read(path) {
            Ok(bytes) => images.push(ImageInput::new(name, bytes)),
            Err(e) => warn!("Skipping unreadable file {}: {}", path.display(), e),
        }
    }

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let (coordinator, usage) = build_coordinator(&config)?;
    let tick = pb.clone();
    let coordinator = coordinator.with_progress(Arc::new(move |_: &OrderRecord| tick.inc(1)));

    let mut records = coordinator.extract_batch(images).await;
    pb.finish_with_message("OCR complete");

    if !args.no_enrich {
        eprintln!("{} Resolving addresses...", style("ℹ").blue());
        records = coordinator.enrich_batch(records).await;
    }
    usage.flush();

    let json = records_to_json(&records)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &json)?;
        eprintln!("{} Records written to {}", style("✓").green(), output_path.display());
    } else {
        println!("{}", json);
    }

    if let Some(csv_path) = &args.csv {
        write_csv(csv_path, &records)?;
        eprintln!("{} CSV written to {}", style("✓").green(), csv_path.display());
    }

    print_summary(&records, start);
    Ok(())
}

fn print_summary(records: &[OrderRecord], start: Instant) {
    let failed: Vec<_> = records.iter().filter(|r| r.is_error()).collect();
    let unconfirmed = records
        .iter()
        .filter(|r| !r.is_error() && !r.address_valid)
        .count();

    eprintln!();
    eprintln!(
        "{} Processed {} images in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed, {} unconfirmed addresses",
        style(records.len() - failed.len()).green(),
        style(failed.len()).red(),
        style(unconfirmed).yellow()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed images:").red());
        for record in &failed {
            eprintln!("  - {}: {}", record.name.trim_start_matches("ERROR: "), record.address);
        }
    }

    debug!("Batch finished in {:?}", start.elapsed());
}
