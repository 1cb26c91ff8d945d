//! Calculator state for interactive sessions.
//!
//! Holds the raw input text alongside the last computed result, so a new
//! line of input only triggers a computation when the income it denotes
//! actually changes.

use rust_decimal::Decimal;
use tax_core::{BracketSlice, BracketTable, TaxEngine, TaxResult, compute_tax};
use tracing::debug;

use crate::input::sanitize_income;

/// Session state: one bracket table, the current input, and its result.
///
/// The table is fixed for the life of the state; switching schedules means
/// building a new state.
#[derive(Debug, Clone)]
pub struct CalculatorState {
    table: BracketTable,
    input: String,
    income: Decimal,
    result: TaxResult,
    recomputes: usize,
}

impl CalculatorState {
    /// Create a state showing the zero-income result for `table`.
    pub fn new(table: BracketTable) -> Self {
        let result = compute_tax(Decimal::ZERO, &table);
        Self {
            table,
            input: String::new(),
            income: Decimal::ZERO,
            result,
            recomputes: 0,
        }
    }

    /// Replace the input text, recomputing only if the sanitized income
    /// differs from the current one.
    pub fn set_input(
        &mut self,
        text: &str,
    ) -> &TaxResult {
        self.input = text.to_string();

        let income = sanitize_income(text);
        if income != self.income {
            self.income = income;
            self.result = compute_tax(income, &self.table);
            self.recomputes += 1;
            debug!(%income, tax = %self.result.tax, "recomputed");
        }

        &self.result
    }

    /// Reset to empty input.
    pub fn clear(&mut self) -> &TaxResult {
        self.set_input("")
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn result(&self) -> &TaxResult {
        &self.result
    }

    pub fn table(&self) -> &BracketTable {
        &self.table
    }

    /// Per-band contributions for the current income.
    pub fn breakdown(&self) -> Vec<BracketSlice> {
        TaxEngine::new(&self.table).breakdown(self.income)
    }

    /// Number of computations triggered by input changes.
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }
}
