//! Progressive (marginal-bracket) income tax engine.
//!
//! Each band is taxed only on the portion of income that falls inside it:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | `span = min(remaining, upper_bound - last_cap)`, floored at zero |
//! | 2    | Zero span: advance `last_cap` and move to the next band |
//! | 3    | Otherwise add `span * rate` to tax and record `rate` as marginal |
//! | 4    | Stop once no income remains |
//!
//! The unbounded top band takes whatever income remains.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::BracketTable;
//! use tax_core::calculations::compute_tax;
//!
//! let table = BracketTable::reference();
//! let result = compute_tax(dec!(150000), &table);
//!
//! assert_eq!(result.tax, dec!(28847.00));
//! assert_eq!(result.net, dec!(121153.00));
//! assert_eq!(result.marginal_rate, dec!(0.24));
//! ```

use rust_decimal::Decimal;
use tracing::trace;

use crate::calculations::common::max;
use crate::{BracketSlice, BracketTable, TaxResult};

/// Computes tax, net income, effective rate and marginal rate for `income`.
///
/// Negative income is treated as zero. The function never fails for a
/// validated table.
pub fn compute_tax(
    income: Decimal,
    table: &BracketTable,
) -> TaxResult {
    TaxEngine::new(table).calculate(income)
}

/// Calculator bound to a single bracket table.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    table: &'a BracketTable,
}

impl<'a> TaxEngine<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a BracketTable {
        self.table
    }

    /// Runs the progressive calculation for `income`.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> TaxResult {
        self.walk(income, |_| {})
    }

    /// Per-band contributions for `income`, in ascending band order.
    ///
    /// Bands that receive no income are omitted. The slice taxes sum to
    /// [`TaxEngine::calculate`]'s `tax`.
    pub fn breakdown(
        &self,
        income: Decimal,
    ) -> Vec<BracketSlice> {
        let mut slices = Vec::with_capacity(self.table.len());
        self.walk(income, |slice| slices.push(slice));
        slices
    }

    fn walk(
        &self,
        income: Decimal,
        mut on_slice: impl FnMut(BracketSlice),
    ) -> TaxResult {
        let income = max(income, Decimal::ZERO);

        let mut remaining = income;
        let mut last_cap = Decimal::ZERO;
        let mut tax = Decimal::ZERO;
        let mut marginal_rate = Decimal::ZERO;

        for bracket in self.table {
            let span = match bracket.upper_bound {
                Some(cap) => max(remaining.min(cap - last_cap), Decimal::ZERO),
                None => max(remaining, Decimal::ZERO),
            };

            if span <= Decimal::ZERO {
                if let Some(cap) = bracket.upper_bound {
                    last_cap = cap;
                }
                continue;
            }

            let band_tax = span * bracket.rate;
            trace!(%span, rate = %bracket.rate, %band_tax, "taxed band");
            on_slice(BracketSlice {
                lower_bound: last_cap,
                upper_bound: bracket.upper_bound,
                rate: bracket.rate,
                taxable: span,
                tax: band_tax,
            });

            tax += band_tax;
            remaining -= span;
            marginal_rate = bracket.rate;
            if let Some(cap) = bracket.upper_bound {
                last_cap = cap;
            }

            if remaining <= Decimal::ZERO {
                break;
            }
        }

        let effective_rate = if income > Decimal::ZERO {
            tax / income
        } else {
            Decimal::ZERO
        };

        TaxResult {
            tax,
            net: income - tax,
            effective_rate,
            marginal_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::Bracket;
    use crate::calculations::common::round_dp_half_up;

    fn reference() -> BracketTable {
        BracketTable::reference()
    }

    // =========================================================================
    // compute_tax scenario tests
    // =========================================================================

    #[test]
    fn compute_tax_zero_income_is_all_zero() {
        let result = compute_tax(dec!(0), &reference());

        assert_eq!(result, TaxResult::default());
    }

    #[test]
    fn compute_tax_at_first_cap() {
        let result = compute_tax(dec!(11925), &reference());

        assert_eq!(result.tax, dec!(1192.50));
        assert_eq!(result.net, dec!(10732.50));
        assert_eq!(result.marginal_rate, dec!(0.10));
    }

    #[test]
    fn compute_tax_at_second_cap() {
        let result = compute_tax(dec!(48475), &reference());

        // 1192.50 + (48475 - 11925) * 0.12 = 1192.50 + 4386.00
        assert_eq!(result.tax, dec!(5578.50));
        assert_eq!(result.marginal_rate, dec!(0.12));
    }

    #[test]
    fn compute_tax_inside_fourth_band() {
        let result = compute_tax(dec!(150000), &reference());

        // 1192.50 + 4386.00 + 12072.50 + (150000 - 103350) * 0.24
        assert_eq!(result.tax, dec!(28847.00));
        assert_eq!(result.net, dec!(121153.00));
        assert_eq!(result.marginal_rate, dec!(0.24));
        assert_eq!(round_dp_half_up(result.effective_rate, 4), dec!(0.1923));
    }

    #[test]
    fn compute_tax_reaches_unbounded_band() {
        let result = compute_tax(dec!(1000000), &reference());

        // 188769.75 through 626350, then 373650 * 0.37
        assert_eq!(result.tax, dec!(327020.25));
        assert_eq!(result.marginal_rate, dec!(0.37));
    }

    #[test]
    fn compute_tax_one_past_cap_moves_marginal_rate() {
        let result = compute_tax(dec!(11926), &reference());

        assert_eq!(result.tax, dec!(1192.62));
        assert_eq!(result.marginal_rate, dec!(0.12));
    }

    #[test]
    fn compute_tax_fractional_income() {
        let result = compute_tax(dec!(0.50), &reference());

        assert_eq!(result.tax, dec!(0.05));
        assert_eq!(result.effective_rate, dec!(0.10));
    }

    #[test]
    fn compute_tax_negative_income_treated_as_zero() {
        let result = compute_tax(dec!(-5000), &reference());

        assert_eq!(result, TaxResult::default());
    }

    #[test]
    fn compute_tax_single_unbounded_band_is_flat() {
        let table = BracketTable::new(vec![Bracket::unbounded(dec!(0.20))]).unwrap();

        let result = compute_tax(dec!(12345), &table);

        assert_eq!(result.tax, dec!(2469.00));
        assert_eq!(result.effective_rate, dec!(0.20));
        assert_eq!(result.marginal_rate, dec!(0.20));
    }

    #[test]
    fn compute_tax_zero_rate_band_still_sets_marginal() {
        let table = BracketTable::new(vec![
            Bracket::bounded(dec!(1000), dec!(0)),
            Bracket::unbounded(dec!(0.50)),
        ])
        .unwrap();

        let below = compute_tax(dec!(600), &table);
        let above = compute_tax(dec!(1600), &table);

        assert_eq!(below.tax, dec!(0));
        assert_eq!(below.marginal_rate, dec!(0));
        assert_eq!(above.tax, dec!(300.0));
        assert_eq!(above.marginal_rate, dec!(0.50));
    }

    #[test]
    fn compute_tax_zero_span_band_advances_cap() {
        // Out-of-order bounds never pass validation; build directly to
        // exercise the zero-span path.
        let table = BracketTable::from_unchecked(vec![
            Bracket::bounded(dec!(100), dec!(0.10)),
            Bracket::bounded(dec!(50), dec!(0.20)),
            Bracket::bounded(dec!(200), dec!(0.30)),
            Bracket::unbounded(dec!(0.40)),
        ]);

        let result = compute_tax(dec!(150), &table);

        // 100 * 0.10 + (150 - 100) * 0.30; the 50-cap band contributes nothing
        assert_eq!(result.tax, dec!(25.00));
        assert_eq!(result.marginal_rate, dec!(0.30));
    }

    // =========================================================================
    // breakdown tests
    // =========================================================================

    #[test]
    fn breakdown_lists_only_touched_bands() {
        let table = reference();
        let engine = TaxEngine::new(&table);

        let slices = engine.breakdown(dec!(50000));

        assert_eq!(slices.len(), 3);
        assert_eq!(
            slices[2],
            BracketSlice {
                lower_bound: dec!(48475),
                upper_bound: Some(dec!(103350)),
                rate: dec!(0.22),
                taxable: dec!(1525),
                tax: dec!(335.50),
            }
        );
    }

    #[test]
    fn breakdown_sums_to_total_tax() {
        let table = reference();
        let engine = TaxEngine::new(&table);

        let total: Decimal = engine.breakdown(dec!(777777)).iter().map(|s| s.tax).sum();

        assert_eq!(total, engine.calculate(dec!(777777)).tax);
    }

    #[test]
    fn breakdown_top_band_is_unbounded() {
        let table = reference();
        let engine = TaxEngine::new(&table);

        let slices = engine.breakdown(dec!(700000));
        let last = slices.last().unwrap();

        assert_eq!(last.upper_bound, None);
        assert_eq!(last.taxable, dec!(73650));
    }

    #[test]
    fn breakdown_zero_income_is_empty() {
        let table = reference();

        assert!(TaxEngine::new(&table).breakdown(dec!(0)).is_empty());
    }
}
