use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous income band taxed at a single rate.
///
/// The band covers `(previous upper bound, upper_bound]`. An `upper_bound`
/// of `None` marks the unbounded top band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl Bracket {
    /// A band that ends at `upper_bound`.
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    /// The open-ended top band.
    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }
}
