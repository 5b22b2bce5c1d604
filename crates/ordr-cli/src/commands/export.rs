//! Export command - records JSON to the spreadsheet CSV layout.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use ordr_core::OrderRecord;
use ordr_core::models::order::records_from_json;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Records JSON file produced by `process` or `batch`
    #[arg(required = true)]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// Leave error records out
    #[arg(long)]
    skip_errors: bool,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.input)?;
    let mut records = records_from_json(&content)?;

    if args.skip_errors {
        records.retain(|r| !r.is_error());
    }

    write_csv(&args.output, &records)?;
    println!(
        "{} Exported {} records to {}",
        style("✓").green(),
        records.len(),
        args.output.display()
    );

    Ok(())
}

/// Columns: name, an empty column, address, phone.
pub fn write_csv(path: &Path, records: &[OrderRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["name", "", "address", "phone"])?;
    for record in records {
        wtr.write_record([
            record.name.as_str(),
            "",
            record.address.as_str(),
            record.phone.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
