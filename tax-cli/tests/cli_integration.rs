//! End-to-end tests that drive the calculator through on-disk config
//! fixtures and in-memory sessions.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use tax_cli::app::{self, OutputOptions};
use tax_cli::{CalculatorConfig, CalculatorState, DisplayOptions};
use tax_core::BracketTable;
use tax_data::TableLoadError;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run_once_text(
    state: &mut CalculatorState,
    income: &str,
    display: &DisplayOptions,
    output: &OutputOptions,
) -> String {
    let mut out = Vec::new();
    app::run_once(&mut out, state, income, display, output).expect("run_once should succeed");
    String::from_utf8(out).expect("output is UTF-8")
}

#[test]
fn test_config_fixture_resolves_relative_brackets() {
    let config = CalculatorConfig::load(&fixture_path("calculator.toml")).unwrap();

    assert_eq!(config.brackets, Some(fixture_path("flat_brackets.csv")));
    assert_eq!(config.display.currency_symbol, "€");
}

#[test]
fn test_config_fixture_drives_calculation() {
    let config = CalculatorConfig::load(&fixture_path("calculator.toml")).unwrap();
    let table = config.bracket_table().unwrap();
    let mut state = CalculatorState::new(table);

    let text = run_once_text(
        &mut state,
        "20000",
        &config.display,
        &OutputOptions::default(),
    );

    // 10000 untaxed, 10000 at 25.5%
    assert!(text.contains("€2,550.00"), "{text}");
    assert!(text.contains("€17,450.00"), "{text}");
    assert!(text.contains("12.8%"), "{text}");
    assert!(text.contains("25.5%"), "{text}");
}

#[test]
fn test_missing_bracket_file_fails_at_startup() {
    let config = CalculatorConfig::load(&fixture_path("broken.toml")).unwrap();

    let result = config.bracket_table();

    assert!(matches!(result, Err(TableLoadError::Io { .. })));
}

#[test]
fn test_reference_scenarios_one_shot() {
    let display = DisplayOptions::default();
    let output = OutputOptions::default();
    let cases = [
        ("0", "$0.00", "0%"),
        ("11925", "$1,192.50", "10%"),
        ("48475", "$5,578.50", "12%"),
        ("150000", "$28,847.00", "24%"),
        ("1000000", "$327,020.25", "37%"),
    ];

    for (income, tax, marginal) in cases {
        let mut state = CalculatorState::new(BracketTable::reference());
        let text = run_once_text(&mut state, income, &display, &output);
        assert!(text.contains(tax), "income {income}: {text}");
        assert!(text.contains(marginal), "income {income}: {text}");
    }
}

#[test]
fn test_one_shot_with_brackets_and_breakdown() {
    let mut state = CalculatorState::new(BracketTable::reference());
    let output = OutputOptions {
        breakdown: true,
        show_brackets: true,
        ..Default::default()
    };

    let text = run_once_text(&mut state, "$60,000", &DisplayOptions::default(), &output);

    assert!(text.contains("∞ (and above)"));
    assert!(text.contains("Taxable"));
    assert!(text.contains("$11,525.00"), "{text}");
}

#[test]
fn test_garbage_input_reports_zero() {
    let mut state = CalculatorState::new(BracketTable::reference());
    let output = OutputOptions {
        json: true,
        ..Default::default()
    };

    let text = run_once_text(&mut state, "not a number", &DisplayOptions::default(), &output);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["tax"], "$0.00");
    assert_eq!(json["effective_rate"], "0.00%");
    assert_eq!(json["marginal_rate"], "0%");
}

#[test]
fn test_interactive_session_transcript() {
    let mut state = CalculatorState::new(BracketTable::reference());
    let mut out = Vec::new();
    let session = "help\nbrackets\n150000\nclear\n";

    app::run_interactive(
        session.as_bytes(),
        &mut out,
        &mut state,
        &DisplayOptions::default(),
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("How it works"));
    assert!(text.contains("$626,350.00"));
    assert!(text.contains("$28,847.00"));
    assert_eq!(state.income(), Decimal::ZERO);
    assert_eq!(state.input(), "");
    assert_eq!(text.matches(app::PROMPT).count(), 5);
}
