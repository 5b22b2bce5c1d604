//! CLI application for extracting order contacts from slip photos.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, enrich, export, parse, process, usage};

/// Order slip OCR - Extract name, address and phone from order photos
#[derive(Parser)]
#[command(name = "ordr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single order photo
    Process(process::ProcessArgs),

    /// Process every photo matching a glob pattern
    Batch(batch::BatchArgs),

    /// Run extraction on already recognized text
    Parse(parse::ParseArgs),

    /// Resolve one address against the registries
    Enrich(enrich::EnrichArgs),

    /// Convert a records JSON file to the spreadsheet CSV layout
    Export(export::ExportArgs),

    /// Show this month's OCR usage
    Usage,

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries the records.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Parse(args) => parse::run(args, config_path).await,
        Commands::Enrich(args) => enrich::run(args, config_path).await,
        Commands::Export(args) => export::run(args),
        Commands::Usage => usage::run(config_path),
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
