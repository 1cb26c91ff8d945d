use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a single tax computation. Derived per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxResult {
    /// Total tax owed across all bands.
    pub tax: Decimal,

    /// Income remaining after tax (`income - tax`).
    pub net: Decimal,

    /// Total tax divided by total income, or zero for zero income.
    pub effective_rate: Decimal,

    /// Rate of the band holding the last unit of income.
    pub marginal_rate: Decimal,
}

/// The contribution of one band to a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    /// Portion of income falling inside this band.
    pub taxable: Decimal,
    pub tax: Decimal,
}
