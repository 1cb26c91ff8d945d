use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::Bracket;

/// Reasons a bracket table is rejected at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    /// The table contains no brackets at all.
    #[error("bracket table is empty")]
    Empty,

    /// The first bracket's upper bound is zero or negative.
    #[error("bracket {index} has non-positive upper bound {bound}")]
    NonPositiveBound { index: usize, bound: Decimal },

    /// An upper bound is not strictly greater than the one before it.
    #[error("bracket {index} upper bound {bound} does not exceed previous bound {previous}")]
    NonIncreasingBound {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    /// A rate lies outside `[0, 1]`.
    #[error("bracket {index} rate {rate} is outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    /// The last bracket has a finite upper bound.
    #[error("last bracket must be unbounded")]
    MissingUnboundedBracket,

    /// An unbounded bracket appears before the end of the table.
    #[error("unbounded bracket at position {index} is not the last bracket")]
    UnboundedBracketNotLast { index: usize },
}

/// An ordered, validated sequence of tax brackets.
///
/// A table can only be obtained through [`BracketTable::new`] (or
/// [`BracketTable::reference`]), so holding one guarantees:
///
/// - at least one bracket,
/// - strictly increasing upper bounds, the first of them positive,
/// - a single unbounded bracket in last position,
/// - every rate within `[0, 1]`.
///
/// Tables are immutable. Switching to a different set of rates means
/// building a new table.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{Bracket, BracketTable};
///
/// let table = BracketTable::new(vec![
///     Bracket::bounded(dec!(10000), dec!(0.10)),
///     Bracket::unbounded(dec!(0.20)),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.lower_bound(1), dec!(10000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Validates `brackets` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns the first [`BracketTableError`] found, scanning in order.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last_index = brackets.len() - 1;
        let mut previous: Option<Decimal> = None;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedBracketNotLast { index });
                }
                None => {}
                Some(_) if index == last_index => {
                    return Err(BracketTableError::MissingUnboundedBracket);
                }
                Some(bound) => {
                    match previous {
                        None if bound <= Decimal::ZERO => {
                            return Err(BracketTableError::NonPositiveBound { index, bound });
                        }
                        Some(prev) if bound <= prev => {
                            return Err(BracketTableError::NonIncreasingBound {
                                index,
                                bound,
                                previous: prev,
                            });
                        }
                        _ => {}
                    }
                    previous = Some(bound);
                }
            }
        }

        debug!(brackets = brackets.len(), "validated bracket table");
        Ok(Self { brackets })
    }

    /// The built-in 2025 single-filer federal schedule.
    pub fn reference() -> Self {
        Self {
            brackets: vec![
                Bracket::bounded(dec!(11925), dec!(0.10)),
                Bracket::bounded(dec!(48475), dec!(0.12)),
                Bracket::bounded(dec!(103350), dec!(0.22)),
                Bracket::bounded(dec!(197300), dec!(0.24)),
                Bracket::bounded(dec!(250525), dec!(0.32)),
                Bracket::bounded(dec!(626350), dec!(0.35)),
                Bracket::unbounded(dec!(0.37)),
            ],
        }
    }

    #[cfg(test)]
    pub(crate) fn from_unchecked(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false for a constructed table; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// The exclusive lower edge of the bracket at `index`: the previous
    /// bracket's upper bound, or zero for the first.
    pub fn lower_bound(
        &self,
        index: usize,
    ) -> Decimal {
        index
            .checked_sub(1)
            .and_then(|prev| self.brackets.get(prev))
            .and_then(|b| b.upper_bound)
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl<'a> IntoIterator for &'a BracketTable {
    type Item = &'a Bracket;
    type IntoIter = std::slice::Iter<'a, Bracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.brackets.iter()
    }
}
