//! Formatting of tax results for the terminal.
//!
//! Currency is shown with two decimals and thousands separators. Rates are
//! shown as percentages with a configurable number of decimals (two for the
//! effective rate, none for the marginal rate by default).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};
use tax_core::calculations::common::{round_dp_half_up, round_half_up};
use tax_core::{BracketSlice, BracketTable, TaxResult};

/// Label shown in place of the top band's missing upper bound.
pub const UNBOUNDED_LABEL: &str = "∞ (and above)";

/// User-adjustable presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub effective_precision: u32,
    pub marginal_precision: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            effective_precision: 2,
            marginal_precision: 0,
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats `value` as currency, e.g. `$28,847.00` or `-$1,234.50`.
pub fn format_currency(
    value: Decimal,
    symbol: &str,
) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}{symbol}{}.{fraction}", group_thousands(whole))
}

/// Currency for a present value, empty string otherwise.
pub fn format_optional_currency(
    value: Option<Decimal>,
    symbol: &str,
) -> String {
    value
        .map(|v| format_currency(v, symbol))
        .unwrap_or_default()
}

/// A rate in `[0, 1]` as a percentage: `0.24` → `24%` at precision 0.
pub fn format_percent(
    rate: Decimal,
    precision: u32,
) -> String {
    let percent = round_dp_half_up(rate * Decimal::ONE_HUNDRED, precision);
    format!("{:.*}%", precision as usize, percent)
}

/// A band's upper bound, or [`UNBOUNDED_LABEL`] for the top band.
pub fn format_upper_bound(
    bound: Option<Decimal>,
    symbol: &str,
) -> String {
    bound
        .map(|b| format_currency(b, symbol))
        .unwrap_or_else(|| UNBOUNDED_LABEL.to_string())
}

#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "Amount")]
    value: String,
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "Up to")]
    up_to: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Debug, Clone, Tabled)]
struct SliceRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxable")]
    taxable: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

fn right_aligned<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// The four headline figures for `income`.
pub fn render_summary(
    income: Decimal,
    result: &TaxResult,
    options: &DisplayOptions,
) -> String {
    let symbol = options.currency_symbol.as_str();
    let rows = vec![
        SummaryRow {
            label: "Income",
            value: format_currency(income, symbol),
        },
        SummaryRow {
            label: "Federal tax",
            value: format_currency(result.tax, symbol),
        },
        SummaryRow {
            label: "Net (after federal tax)",
            value: format_currency(result.net, symbol),
        },
        SummaryRow {
            label: "Effective tax rate",
            value: format_percent(result.effective_rate, options.effective_precision),
        },
        SummaryRow {
            label: "Marginal tax rate",
            value: format_percent(result.marginal_rate, options.marginal_precision),
        },
    ];
    right_aligned(rows)
}

/// The bracket schedule itself, one row per band.
pub fn render_brackets(
    table: &BracketTable,
    options: &DisplayOptions,
) -> String {
    let rows: Vec<BracketRow> = table
        .iter()
        .map(|bracket| BracketRow {
            up_to: format_upper_bound(bracket.upper_bound, &options.currency_symbol),
            rate: format_percent(bracket.rate, options.marginal_precision),
        })
        .collect();
    right_aligned(rows)
}

/// How much income fell into each band and what it was taxed.
pub fn render_breakdown(
    slices: &[BracketSlice],
    options: &DisplayOptions,
) -> String {
    let symbol = options.currency_symbol.as_str();
    let rows: Vec<SliceRow> = slices
        .iter()
        .map(|slice| SliceRow {
            from: format_currency(slice.lower_bound, symbol),
            to: format_upper_bound(slice.upper_bound, symbol),
            rate: format_percent(slice.rate, options.marginal_precision),
            taxable: format_currency(slice.taxable, symbol),
            tax: format_currency(slice.tax, symbol),
        })
        .collect();
    right_aligned(rows)
}

/// Machine-readable report for `--json`.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub income: String,
    pub tax: String,
    pub net: String,
    pub effective_rate: String,
    pub marginal_rate: String,
    pub raw: RawFigures,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<BracketSlice>>,
}

/// Unrounded figures alongside the formatted ones.
#[derive(Debug, Serialize)]
pub struct RawFigures {
    pub income: Decimal,
    #[serde(flatten)]
    pub result: TaxResult,
}

impl ReportData {
    pub fn new(
        income: Decimal,
        result: &TaxResult,
        breakdown: Option<Vec<BracketSlice>>,
        options: &DisplayOptions,
    ) -> Self {
        let symbol = options.currency_symbol.as_str();
        Self {
            income: format_currency(income, symbol),
            tax: format_currency(result.tax, symbol),
            net: format_currency(result.net, symbol),
            effective_rate: format_percent(result.effective_rate, options.effective_precision),
            marginal_rate: format_percent(result.marginal_rate, options.marginal_precision),
            raw: RawFigures {
                income,
                result: *result,
            },
            breakdown,
        }
    }
}
