//! Integration tests for bracket table loading from on-disk fixtures.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{BracketTable, BracketTableError, compute_tax};
use tax_data::{BracketTableLoader, TableLoadError};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

#[test]
fn test_load_csv_fixture_matches_reference() {
    let table = BracketTableLoader::load_file(&fixture("brackets_2025.csv"))
        .expect("Failed to load CSV fixture");

    assert_eq!(table, BracketTable::reference());
}

#[test]
fn test_load_json_fixture_matches_reference() {
    let table = BracketTableLoader::load_file(&fixture("brackets_2025.json"))
        .expect("Failed to load JSON fixture");

    assert_eq!(table, BracketTable::reference());
}

#[test]
fn test_loaded_table_computes_reference_scenarios() {
    let table = BracketTableLoader::load_file(&fixture("brackets_2025.json")).unwrap();

    assert_eq!(compute_tax(dec!(48475), &table).tax, dec!(5578.50));
    assert_eq!(compute_tax(dec!(150000), &table).tax, dec!(28847.00));
    assert_eq!(compute_tax(dec!(1000000), &table).marginal_rate, dec!(0.37));
}

#[test]
fn test_load_flat_fixture() {
    let table = BracketTableLoader::load_file(&fixture("brackets_flat.json")).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(compute_tax(dec!(1000), &table).tax, dec!(200));
}

#[test]
fn test_unordered_fixture_fails_fast() {
    let result = BracketTableLoader::load_file(&fixture("brackets_unordered.csv"));

    match result {
        Err(TableLoadError::Invalid(BracketTableError::NonIncreasingBound {
            index,
            bound,
            previous,
        })) => {
            assert_eq!(index, 1);
            assert_eq!(bound, dec!(11925));
            assert_eq!(previous, dec!(48475));
        }
        other => panic!("expected NonIncreasingBound, got {other:?}"),
    }
}

#[test]
fn test_missing_file_reports_path() {
    let path = fixture("does_not_exist.csv");

    let err = BracketTableLoader::load_file(&path).expect_err("missing file should fail");

    assert!(matches!(err, TableLoadError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}
