//! Parse command - extraction on text that was already recognized.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use ordr_core::{AddressEnrichmentEngine, OrderParser, OrderTextParser};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Resolve the extracted address against the registries
    #[arg(long)]
    enrich: bool,

    /// Print the normalized lines and extraction warnings
    #[arg(long)]
    show_lines: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)?
    };

    let parser = OrderTextParser::from_config(&config.extraction);
    let result = parser.parse(&text);
    debug!("Extraction took {}ms", result.processing_time_ms);

    if args.show_lines {
        for (i, line) in result.lines.iter().enumerate() {
            let marker = if Some(i) == result.phone_line_index { "*" } else { " " };
            eprintln!("{}{:>3}  {}", marker, i, line);
        }
        for warning in &result.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }

    let mut record = result.record.with_default_phone(&config.order.default_phone);

    if args.enrich {
        let engine = AddressEnrichmentEngine::from_config(&config.registry)?;
        let (address, valid) = engine.enrich(&record.address).await;
        record.address = address;
        record.address_valid = valid;
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
