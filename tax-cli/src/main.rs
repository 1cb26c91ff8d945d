use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use tax_cli::app::{self, OutputOptions};
use tax_cli::{CalculatorConfig, CalculatorState, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax calculator.
///
/// Computes federal tax, net income, and effective and marginal rates for
/// an annual salary. Without an INCOME argument, reads one salary per line
/// from stdin.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version, about)]
struct Cli {
    /// Annual income, e.g. `150000` or `$150,000`.
    #[arg(allow_hyphen_values = true)]
    income: Option<String>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bracket table file (.csv or .json); overrides the config.
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Print a JSON report instead of tables.
    #[arg(long)]
    json: bool,

    /// Show how much income fell into each bracket.
    #[arg(long)]
    breakdown: bool,

    /// Print the bracket table before the result.
    #[arg(long)]
    show_brackets: bool,

    /// Currency symbol for amounts.
    #[arg(long)]
    currency_symbol: Option<String>,

    /// Decimal places for the effective rate.
    #[arg(long)]
    effective_precision: Option<u32>,

    /// Decimal places for the marginal rate.
    #[arg(long)]
    marginal_precision: Option<u32>,

    /// Log filter (e.g. `debug`); overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags take precedence over the config file.
    fn apply_overrides(
        &self,
        config: &mut CalculatorConfig,
    ) {
        if let Some(path) = &self.brackets {
            config.brackets = Some(path.clone());
        }
        if let Some(symbol) = &self.currency_symbol {
            config.display.currency_symbol = symbol.clone();
        }
        if let Some(precision) = self.effective_precision {
            config.display.effective_precision = precision;
        }
        if let Some(precision) = self.marginal_precision {
            config.display.marginal_precision = precision;
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref());
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => CalculatorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    cli.apply_overrides(&mut config);
    debug!(?config, "effective configuration");

    let table = config
        .bracket_table()
        .context("Failed to load bracket table")?;
    info!(brackets = table.len(), "bracket table ready");

    let mut state = CalculatorState::new(table);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.income {
        Some(income) => {
            let output = OutputOptions {
                json: cli.json,
                breakdown: cli.breakdown,
                show_brackets: cli.show_brackets,
            };
            app::run_once(&mut out, &mut state, income, &config.display, &output)
        }
        None => app::run_interactive(io::stdin().lock(), &mut out, &mut state, &config.display),
    }
}
