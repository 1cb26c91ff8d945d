use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tax_data::BracketTableLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate a tax bracket table file.
///
/// The file may be CSV (`up_to,rate` header) or JSON (an array of
/// `{ "upTo": ..., "rate": ... }` objects). The top band's upper bound is
/// left empty, `null`, or written as `Infinity`.
#[derive(Parser, Debug)]
#[command(name = "tax-brackets")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the bracket table (.csv or .json)
    #[arg(short, long)]
    file: PathBuf,

    /// Re-emit the validated table to stdout in this format
    #[arg(short, long, value_enum)]
    export: Option<ExportFormat>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let table = BracketTableLoader::load_file(&args.file)
        .with_context(|| format!("Failed to load bracket table: {}", args.file.display()))?;

    info!(
        "{} is valid: {} brackets",
        args.file.display(),
        table.len()
    );

    match args.export {
        Some(ExportFormat::Csv) => BracketTableLoader::write_csv(&table, io::stdout())
            .context("Failed to write CSV")?,
        Some(ExportFormat::Json) => {
            BracketTableLoader::write_json(&table, io::stdout()).context("Failed to write JSON")?;
            println!();
        }
        None => {
            for (index, bracket) in table.iter().enumerate() {
                let upper = bracket
                    .upper_bound
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "∞".to_string());
                println!(
                    "{:>2}. {:>12} – {:<12} {}",
                    index + 1,
                    table.lower_bound(index),
                    upper,
                    bracket.rate
                );
            }
        }
    }

    Ok(())
}
