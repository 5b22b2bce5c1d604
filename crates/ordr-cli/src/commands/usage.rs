//! Usage command - this month's OCR call count.

use console::style;

use ordr_core::UsageTracker;

use super::load_config;

pub fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let info = UsageTracker::load(&config.usage).usage();

    println!("OCR usage for {}", style(&info.year_month).bold());
    println!("  Calls:          {}", info.call_count);
    println!("  Free limit:     {}", info.free_limit);

    let remaining = if info.free_remaining == 0 {
        style(info.free_remaining).red()
    } else {
        style(info.free_remaining).green()
    };
    println!("  Free remaining: {}", remaining);
    println!("  Estimated cost: ${:.4}", info.estimated_cost);
    println!();
    println!("Usage file: {}", config.usage.file.display());

    Ok(())
}
