use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::{Bracket, BracketTable, BracketTableError};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket table data.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported bracket file format: '{}' (expected .csv or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid upper bound '{value}' on row {row}")]
    InvalidBound { row: usize, value: String },

    #[error("invalid bracket table: {0}")]
    Invalid(#[from] BracketTableError),
}

/// Spellings accepted for the unbounded top band.
const UNBOUNDED_MARKERS: [&str; 4] = ["inf", "infinity", "+infinity", "∞"];

/// The raw upper bound cell, before interpretation.
///
/// Numbers become [`UpperBound::Amount`]. Strings are kept as text and
/// resolved (numeric, unbounded marker, or invalid) when the records are
/// built into a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpperBound {
    Amount(Decimal),
    Text(String),
}

// Hand-written so that CSV cells, which the csv crate type-sniffs, and JSON
// numbers both land here. `inf` sniffs as an f64 and must stay unbounded.
impl<'de> Deserialize<'de> for UpperBound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct UpperBoundVisitor;

        impl serde::de::Visitor<'_> for UpperBoundVisitor {
            type Value = UpperBound;

            fn expecting(
                &self,
                f: &mut std::fmt::Formatter<'_>,
            ) -> std::fmt::Result {
                f.write_str("a number, a numeric string, or an unbounded marker")
            }

            fn visit_u64<E: serde::de::Error>(
                self,
                v: u64,
            ) -> Result<UpperBound, E> {
                Ok(UpperBound::Amount(Decimal::from(v)))
            }

            fn visit_i64<E: serde::de::Error>(
                self,
                v: i64,
            ) -> Result<UpperBound, E> {
                Ok(UpperBound::Amount(Decimal::from(v)))
            }

            fn visit_f64<E: serde::de::Error>(
                self,
                v: f64,
            ) -> Result<UpperBound, E> {
                if v.is_infinite() && v.is_sign_positive() {
                    return Ok(UpperBound::Text("inf".to_string()));
                }
                let text = v.to_string();
                Ok(text
                    .parse::<Decimal>()
                    .map(UpperBound::Amount)
                    .unwrap_or(UpperBound::Text(text)))
            }

            fn visit_str<E: serde::de::Error>(
                self,
                v: &str,
            ) -> Result<UpperBound, E> {
                Ok(UpperBound::Text(v.to_string()))
            }
        }

        deserializer.deserialize_any(UpperBoundVisitor)
    }
}

/// A single bracket as it appears in a CSV row or JSON array element.
///
/// - `upTo` / `up_to`: the band's upper bound; empty, `null`, missing, or
///   `Infinity` for the unbounded top band
/// - `rate`: the band's rate as a decimal fraction (e.g., 0.10 for 10%)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRecord {
    #[serde(rename = "upTo", alias = "up_to", default)]
    pub up_to: Option<UpperBound>,
    pub rate: Decimal,
}

impl From<&Bracket> for BracketRecord {
    fn from(bracket: &Bracket) -> Self {
        BracketRecord {
            up_to: bracket.upper_bound.map(UpperBound::Amount),
            rate: bracket.rate,
        }
    }
}

/// Supported bracket file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    /// Picks the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(TableFormat::Csv),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }
}

/// Interprets one upper bound cell. `row` is 1-based for error messages.
fn resolve_upper_bound(
    bound: Option<&UpperBound>,
    row: usize,
) -> Result<Option<Decimal>, TableLoadError> {
    match bound {
        None => Ok(None),
        Some(UpperBound::Amount(amount)) => Ok(Some(*amount)),
        Some(UpperBound::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty()
                || UNBOUNDED_MARKERS
                    .iter()
                    .any(|marker| trimmed.eq_ignore_ascii_case(marker))
            {
                return Ok(None);
            }
            trimmed
                .replace(',', "")
                .parse::<Decimal>()
                .map(Some)
                .map_err(|_| TableLoadError::InvalidBound {
                    row,
                    value: text.clone(),
                })
        }
    }
}

/// Loader for bracket tables from CSV or JSON sources.
///
/// Parsing and validation are separate steps: `parse_*` yields raw
/// [`BracketRecord`]s in file order, and [`BracketTableLoader::build`]
/// turns them into a validated [`BracketTable`].
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader with an `up_to,rate` header.
    pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TableLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse bracket records from a JSON array of `{ "upTo", "rate" }` objects.
    pub fn parse_json<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TableLoadError> {
        let records: Vec<BracketRecord> = serde_json::from_reader(reader)?;
        Ok(records)
    }

    /// Convert parsed records into a validated table.
    ///
    /// # Errors
    ///
    /// * [`TableLoadError::InvalidBound`] if an upper bound is neither a
    ///   number nor an unbounded marker.
    /// * [`TableLoadError::Invalid`] if the brackets break a table invariant.
    pub fn build(records: &[BracketRecord]) -> Result<BracketTable, TableLoadError> {
        let brackets = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let upper_bound = resolve_upper_bound(record.up_to.as_ref(), index + 1)?;
                Ok(Bracket {
                    upper_bound,
                    rate: record.rate,
                })
            })
            .collect::<Result<Vec<_>, TableLoadError>>()?;

        Ok(BracketTable::new(brackets)?)
    }

    /// Parse and validate a table from `reader` in the given format.
    pub fn load<R: Read>(
        reader: R,
        format: TableFormat,
    ) -> Result<BracketTable, TableLoadError> {
        let records = match format {
            TableFormat::Csv => Self::parse_csv(reader)?,
            TableFormat::Json => Self::parse_json(reader)?,
        };
        debug!(?format, records = records.len(), "parsed bracket records");
        Self::build(&records)
    }

    /// Load a table from disk, choosing the format by file extension.
    pub fn load_file(path: &Path) -> Result<BracketTable, TableLoadError> {
        let format = TableFormat::from_path(path)
            .ok_or_else(|| TableLoadError::UnsupportedFormat(path.to_path_buf()))?;
        let file = File::open(path).map_err(|source| TableLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "loading bracket table");
        Self::load(BufReader::new(file), format)
    }

    /// Write `table` as CSV with an `upTo,rate` header. The top band's
    /// bound is left empty.
    pub fn write_csv<W: Write>(
        table: &BracketTable,
        writer: W,
    ) -> Result<(), TableLoadError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for bracket in table {
            wtr.serialize(BracketRecord::from(bracket))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Write `table` as a pretty-printed JSON array.
    pub fn write_json<W: Write>(
        table: &BracketTable,
        writer: W,
    ) -> Result<(), TableLoadError> {
        let records: Vec<BracketRecord> = table.iter().map(BracketRecord::from).collect();
        serde_json::to_writer_pretty(writer, &records)?;
        Ok(())
    }
}
