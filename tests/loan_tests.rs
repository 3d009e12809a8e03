// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use loanbook::config::{ReconcileMode, TrackerConfig};
use loanbook::integrity::check_integrity;
use loanbook::models::{PaymentsLeft, Term};
use loanbook::store::{MemoryStore, TableStore};
use loanbook::tracker::{LoanInput, Tracker};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn tracker_with(config: TrackerConfig) -> Tracker<MemoryStore> {
    Tracker::new(MemoryStore::new(), config).unwrap()
}

fn tracker() -> Tracker<MemoryStore> {
    tracker_with(TrackerConfig::default())
}

fn input<'a>(amount: &'a str, apr: &'a str, term: &'a str, category: &'a str) -> LoanInput<'a> {
    LoanInput {
        total_amount: amount,
        apr,
        term,
        category,
        monthly_payment: None,
    }
}

#[test]
fn add_loan_derives_payment_and_interest() {
    let mut t = tracker();
    let report = t.add_loan(input("1200", "12", "12", "Car"));
    assert!(report.error.is_none());
    let loan = &report.loans[0];
    assert_eq!(loan.term, Term::Fixed(12));
    assert_eq!(loan.monthly_payment, d("106.62"));
    assert_eq!(loan.total_interest, d("79.44"));
    assert_eq!(loan.remaining_balance, d("1200"));
}

#[test]
fn zero_apr_splits_principal_evenly() {
    let mut t = tracker();
    let report = t.add_loan(input("1200", "0", "12", "Car"));
    assert_eq!(report.loans[0].monthly_payment, d("100"));
    assert_eq!(report.loans[0].total_interest, Decimal::ZERO);
}

#[test]
fn indefinite_loan_uses_supplied_payment() {
    let mut t = tracker();
    let report = t.add_loan(LoanInput {
        monthly_payment: Some("50"),
        ..input("1000", "0", "indefinite", "Family")
    });
    let loan = &report.loans[0];
    assert_eq!(loan.term, Term::Indefinite);
    assert_eq!(loan.monthly_payment, d("50"));
    assert_eq!(loan.total_interest, d("17000"));
}

#[test]
fn indefinite_update_assumes_no_interest() {
    let mut t = tracker();
    t.add_loan(input("1000", "6", "indefinite", "Family"));
    let report = t.update_loan(0, input("1000", "6", "0", "Family"));
    let loan = &report.loans[0];
    assert_eq!(loan.term, Term::Indefinite);
    assert_eq!(loan.monthly_payment, d("5"));
    assert_eq!(loan.total_interest, Decimal::ZERO);
}

#[test]
fn payment_splits_interest_and_principal() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    let report = t.add_payment(0, "2024-01-15", "100");
    assert!(report.error.is_none());

    let p = &report.payments[0].payment;
    assert_eq!(p.interest_paid, d("12"));
    assert_eq!(p.principal_paid, d("88"));
    assert_eq!(p.remaining_balance_after, d("1112"));
    assert_eq!(p.payments_left, PaymentsLeft::Count(11));
    assert_eq!(report.loans[0].remaining_balance, d("1112"));
    assert_eq!(report.loans[0].total_interest, d("91.44"));
}

#[test]
fn payment_against_missing_loan_is_rejected() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    let report = t.add_payment(1, "2024-01-15", "100");
    let err = report.error.expect("expected an error");
    assert!(err.contains("loan index 1"), "{}", err);
    assert!(report.payments.is_empty());
    assert_eq!(report.loans[0].remaining_balance, d("1200"));
}

#[test]
fn bad_amount_reports_error_with_current_state() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    let report = t.add_payment(0, "2024-01-15", "lots");
    assert!(report.error.is_some());
    assert_eq!(report.loans.len(), 1);
}

#[test]
fn removing_a_payment_restores_the_loan() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-01-15", "100");
    let report = t.remove_payment(0);
    assert!(report.error.is_none());
    assert!(report.payments.is_empty());
    assert_eq!(report.loans[0].remaining_balance, d("1200"));
    assert_eq!(report.loans[0].total_interest, d("79.44"));
}

#[test]
fn in_place_removal_only_restores_principal() {
    let mut t = tracker_with(TrackerConfig {
        reconcile: ReconcileMode::InPlace,
        ..TrackerConfig::default()
    });
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-01-15", "100");
    let report = t.remove_payment(0);
    assert_eq!(report.loans[0].remaining_balance, d("1200"));
    assert_eq!(report.loans[0].total_interest, d("91.44"));
}

#[test]
fn editing_a_payment_matches_entering_it_that_way() {
    let mut edited = tracker();
    edited.add_loan(input("1200", "12", "12", "Car"));
    edited.add_payment(0, "2024-01-15", "100");
    edited.add_payment(0, "2024-02-15", "100");
    let after_edit = edited.update_payment(0, 0, "2024-01-15", "200");
    assert!(after_edit.error.is_none());

    let mut direct = tracker();
    direct.add_loan(input("1200", "12", "12", "Car"));
    direct.add_payment(0, "2024-01-15", "200");
    let expected = direct.add_payment(0, "2024-02-15", "100");

    assert_eq!(after_edit.loans, expected.loans);
    let got: Vec<_> = after_edit.payments.iter().map(|p| &p.payment).collect();
    let want: Vec<_> = expected.payments.iter().map(|p| &p.payment).collect();
    assert_eq!(got, want);
}

#[test]
fn moving_a_payment_between_loans_reconciles_both() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_loan(input("600", "0", "6", "Phone"));
    t.add_payment(0, "2024-01-15", "100");
    let report = t.update_payment(0, 1, "2024-01-15", "100");
    assert!(report.error.is_none());
    assert_eq!(report.loans[0].remaining_balance, d("1200"));
    assert_eq!(report.loans[0].total_interest, d("79.44"));
    assert_eq!(report.loans[1].remaining_balance, d("500"));
    assert_eq!(report.payments[0].payment.loan_index, 1);
    assert_eq!(report.payments[0].payment.payments_left, PaymentsLeft::Count(5));
}

#[test]
fn overpayment_clears_the_loan() {
    let mut t = tracker();
    t.add_loan(input("100", "0", "2", "Small"));
    let report = t.add_payment(0, "2024-01-01", "150");
    let p = &report.payments[0].payment;
    assert_eq!(p.remaining_balance_after, d("-50"));
    assert_eq!(p.payments_left, PaymentsLeft::Count(0));
}

#[test]
fn removing_a_loan_repoints_later_payments() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_loan(input("600", "0", "6", "Phone"));
    t.add_loan(input("300", "0", "3", "Bike"));
    t.add_payment(0, "2024-01-10", "100");
    t.add_payment(1, "2024-01-11", "100");
    t.add_payment(2, "2024-01-12", "100");

    let report = t.remove_loan(1);
    assert!(report.error.is_none());
    assert_eq!(report.loans.len(), 2);
    assert_eq!(report.loans[1].category, "Bike");

    let ledger = t.get_initial_data();
    let indices: Vec<usize> = ledger.payments.iter().map(|p| p.payment.loan_index).collect();
    assert_eq!(indices, vec![0, 1]);
    assert!(check_integrity(t.store()).unwrap().is_empty());
}

#[test]
fn update_loan_replays_existing_payments() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-01-15", "100");
    let report = t.update_loan(0, input("1000", "0", "10", "Car"));
    assert!(report.error.is_none());
    let loan = &report.loans[0];
    assert_eq!(loan.monthly_payment, d("100"));
    assert_eq!(loan.remaining_balance, d("900"));

    let ledger = t.get_initial_data();
    assert_eq!(ledger.payments[0].payment.interest_paid, Decimal::ZERO);
    assert_eq!(ledger.payments[0].payment.principal_paid, d("100"));
}

#[test]
fn remove_unknown_loan_leaves_state_untouched() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    let report = t.remove_loan(3);
    assert!(report.error.is_some());
    assert_eq!(report.loans.len(), 1);
}

#[test]
fn doctor_flags_payments_without_a_loan() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-01-15", "100");
    t.store_mut()
        .insert_table("Loans", loanbook::store::LOANS.header_row(), Vec::new());
    let issues = check_integrity(t.store()).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, "dangling_payment");
}

#[test]
fn doctor_flags_balance_drift() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-01-15", "100");
    t.store_mut()
        .update_cells("Loans", 0, 6, vec!["900.00".into()])
        .unwrap();
    let issues = check_integrity(t.store()).unwrap();
    assert!(issues.iter().any(|i| i.kind == "balance_drift"));
}

#[test]
fn backdated_payment_is_slotted_in_by_date() {
    let mut t = tracker();
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-05-01", "500");
    let report = t.add_payment(0, "2024-04-01", "100");
    assert!(report.error.is_none());
    assert_eq!(report.loans[0].remaining_balance, d("623.12"));
    assert_eq!(report.loans[0].total_interest, d("102.56"));
    assert!(check_integrity(t.store()).unwrap().is_empty());

    let mut in_order = tracker();
    in_order.add_loan(input("1200", "12", "12", "Car"));
    in_order.add_payment(0, "2024-04-01", "100");
    let expected = in_order.add_payment(0, "2024-05-01", "500");
    assert_eq!(report.loans, expected.loans);
    let got: Vec<_> = report.payments.iter().map(|p| &p.payment).collect();
    let want: Vec<_> = expected.payments.iter().map(|p| &p.payment).collect();
    assert_eq!(got, want);

    let unchanged = t.update_payment(0, 0, "2024-05-01", "500");
    assert_eq!(unchanged.loans[0].remaining_balance, d("623.12"));
}

#[test]
fn in_place_edit_resplits_against_current_balance() {
    let mut t = tracker_with(TrackerConfig {
        reconcile: ReconcileMode::InPlace,
        ..TrackerConfig::default()
    });
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-01-15", "100");
    t.add_payment(0, "2024-02-15", "100");

    let report = t.update_payment(0, 0, "2024-01-15", "200");
    assert!(report.error.is_none());
    let loan = &report.loans[0];
    assert_eq!(loan.remaining_balance, d("833.35"));
    assert_eq!(loan.total_interest, d("102.56"));

    let edited = &report.payments[0].payment;
    assert_eq!(edited.amount, d("200"));
    assert_eq!(edited.interest_paid, d("10.23"));
    assert_eq!(edited.principal_paid, d("189.77"));
    assert_eq!(edited.remaining_balance_after, d("833.35"));
    assert_eq!(edited.payments_left, PaymentsLeft::Count(8));
    assert_eq!(report.payments[1].payment.interest_paid, d("11.12"));
}

#[test]
fn in_place_loan_update_keeps_payment_rows() {
    let mut t = tracker_with(TrackerConfig {
        reconcile: ReconcileMode::InPlace,
        ..TrackerConfig::default()
    });
    t.add_loan(input("1200", "12", "12", "Car"));
    t.add_payment(0, "2024-01-15", "100");

    let report = t.update_loan(0, input("1000", "0", "10", "Car"));
    assert!(report.error.is_none());
    assert_eq!(report.loans[0].remaining_balance, d("1000"));
    assert_eq!(report.loans[0].monthly_payment, d("100"));

    let p = &t.get_initial_data().payments[0].payment;
    assert_eq!(p.interest_paid, d("12"));
    assert_eq!(p.principal_paid, d("88"));
    assert_eq!(p.remaining_balance_after, d("1112"));
}

#[test]
fn zero_month_term_adds_an_indefinite_loan() {
    let mut t = tracker();
    let report = t.add_loan(input("1200", "0", "0", "Car"));
    assert!(report.error.is_none());
    assert_eq!(report.loans[0].term, Term::Indefinite);
}
