//! One-shot and interactive front ends over [`CalculatorState`].
//!
//! Both take generic readers and writers so sessions can be driven from
//! in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::warn;

use crate::display::{self, DisplayOptions, ReportData};
use crate::logging;
use crate::state::CalculatorState;

pub const PROMPT: &str = "income> ";

pub const HOW_IT_WORKS: &str = "\
How it works
  1. Your annual salary is parsed and federal income tax is computed
     from the marginal brackets shown by `brackets`.
  2. Each bracket taxes only the portion of income inside its band.
  3. Net income is salary minus federal tax.
  4. The effective rate is tax / salary; the marginal rate is the rate
     on your last dollar of income.
For illustration only; this is not tax advice.

Commands: <amount> | clear | brackets | help | log <level> | quit";

/// What to print besides the headline figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    pub breakdown: bool,
    pub show_brackets: bool,
}

/// Computes and prints the result for a single income string.
pub fn run_once<W: Write>(
    out: &mut W,
    state: &mut CalculatorState,
    income_text: &str,
    display: &DisplayOptions,
    output: &OutputOptions,
) -> Result<()> {
    state.set_input(income_text);

    if output.json {
        let breakdown = output.breakdown.then(|| state.breakdown());
        let report = ReportData::new(state.income(), state.result(), breakdown, display);
        serde_json::to_writer_pretty(&mut *out, &report).context("Failed to write JSON report")?;
        writeln!(out)?;
        return Ok(());
    }

    if output.show_brackets {
        writeln!(out, "{}", display::render_brackets(state.table(), display))?;
    }
    writeln!(
        out,
        "{}",
        display::render_summary(state.income(), state.result(), display)
    )?;
    if output.breakdown && !state.breakdown().is_empty() {
        writeln!(
            out,
            "{}",
            display::render_breakdown(&state.breakdown(), display)
        )?;
    }
    Ok(())
}

/// Reads commands and incomes line by line until `quit` or end of input.
pub fn run_interactive<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    state: &mut CalculatorState,
    display: &DisplayOptions,
) -> Result<()> {
    writeln!(out, "Type an annual salary, or `help` for commands.")?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let command = line.trim();

        match command {
            "quit" | "exit" => break,
            "help" | "?" => writeln!(out, "{HOW_IT_WORKS}")?,
            "brackets" => writeln!(out, "{}", display::render_brackets(state.table(), display))?,
            "clear" => {
                state.clear();
                writeln!(
                    out,
                    "{}",
                    display::render_summary(state.income(), state.result(), display)
                )?;
            }
            _ if command.starts_with("log ") => {
                let level = command.trim_start_matches("log ").trim();
                match logging::set_log_level(level) {
                    Ok(()) => writeln!(out, "log level set to {level}")?,
                    Err(e) => {
                        warn!(error = %e, "log level change rejected");
                        writeln!(out, "cannot change log level: {e}")?;
                    }
                }
            }
            _ => {
                state.set_input(command);
                writeln!(
                    out,
                    "{}",
                    display::render_summary(state.income(), state.result(), display)
                )?;
            }
        }

        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}
