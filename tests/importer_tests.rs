// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::str::FromStr;

use loanbook::config::TrackerConfig;
use loanbook::models::Term;
use loanbook::store::{LEGACY, MemoryStore};
use loanbook::tracker::Tracker;
use loanbook::{cli, commands::importer};
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn tracker() -> Tracker<MemoryStore> {
    Tracker::new(MemoryStore::new(), TrackerConfig::default()).unwrap()
}

fn run_import(tracker: &mut Tracker<MemoryStore>, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["loanbook", "import"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(tracker, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn legacy_table_rows_become_loans() {
    let mut t = tracker();
    t.store_mut().insert_table(
        LEGACY.name,
        LEGACY.header_row(),
        vec![
            row(&["1200", "12", "12", "Car"]),
            row(&["5000", "6", "", "Family"]),
        ],
    );
    let report = t.import_legacy_table();
    assert!(report.error.is_none());
    assert_eq!(report.imported, 2);
    assert_eq!(report.loans[0].monthly_payment, d("106.62"));
    assert_eq!(report.loans[1].term, Term::Indefinite);
    assert_eq!(report.loans[1].monthly_payment, d("25"));
    assert_eq!(report.loans[1].total_interest, d("4000"));
}

#[test]
fn missing_legacy_table_imports_nothing() {
    let mut t = tracker();
    let report = t.import_legacy_table();
    assert!(report.error.is_none());
    assert_eq!(report.imported, 0);
    assert!(report.loans.is_empty());
}

#[test]
fn csv_import_trims_cli_path_argument() {
    let mut t = tracker();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "amount,apr,term,category\n600,0,6, Phone ").unwrap();
    file.flush().unwrap();

    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&mut t, &["csv", "--path", &padded]).unwrap();

    let loans = t.get_initial_data().loans;
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].category, "Phone");
    assert_eq!(loans[0].monthly_payment, d("100"));
}

#[test]
fn csv_import_is_all_or_nothing() {
    let mut t = tracker();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "amount,apr,term,category\n600,0,6,Phone\nabc,5,12,Bad").unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let err = run_import(&mut t, &["csv", "--path", &path]).unwrap_err();
    assert!(err.to_string().contains("Legacy row 2"), "{}", err);
    assert!(t.get_initial_data().loans.is_empty());
}
