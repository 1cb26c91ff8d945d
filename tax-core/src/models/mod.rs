mod bracket_table;
mod tax_bracket;
mod tax_result;

pub use bracket_table::{BracketTable, BracketTableError};
pub use tax_bracket::Bracket;
pub use tax_result::{BracketSlice, TaxResult};
