// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use loanbook::config::TrackerConfig;
use loanbook::store::{MemoryStore, SqliteStore};
use loanbook::tracker::Tracker;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn tracker() -> Tracker<MemoryStore> {
    Tracker::new(MemoryStore::new(), TrackerConfig::default()).unwrap()
}

#[test]
fn monthly_totals_group_by_category() {
    let mut t = tracker();
    t.add_expense("2024-03-05", "20.00", "Groceries", "Food");
    t.add_expense("2024-03-20", "30", "Takeout", "Food");
    t.add_expense("2024-03-21", "12.50", "Bus pass", "Transportation");
    let report = t.add_expense("2024-04-01", "9.99", "Lunch", "Food");
    assert!(report.error.is_none());

    let march = report.summary.month("March 2024").unwrap();
    assert_eq!(march["Food"], d("50"));
    assert_eq!(march["Transportation"], d("12.5"));
    assert_eq!(report.summary.month("April 2024").unwrap()["Food"], d("9.99"));
    assert_eq!(report.summary.overall["Food"], d("59.99"));

    let months: Vec<&str> = report.summary.monthly.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["March 2024", "April 2024"]);
}

#[test]
fn months_are_chronological_across_years() {
    let mut t = tracker();
    t.add_expense("2024-01-10", "1", "a", "Food");
    t.add_expense("2023-12-10", "1", "b", "Food");
    let report = t.get_expenses(None);
    let months: Vec<&str> = report.summary.monthly.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["December 2023", "January 2024"]);
}

#[test]
fn search_is_case_insensitive_and_sorted_by_date() {
    let mut t = tracker();
    t.add_expense("2024-05-02", "5", "Coffee beans", "Food");
    t.add_expense("2024-05-01", "7", "Gas", "Transportation");
    t.add_expense("2024-04-30", "3", "coffee", "Food");

    let report = t.get_expenses(Some("COFFEE"));
    let dates: Vec<String> = report
        .summary
        .expenses
        .iter()
        .map(|r| r.expense.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2024-04-30", "2024-05-02"]);

    let again = t.get_expenses(Some("COFFEE"));
    assert_eq!(again.summary.expenses, report.summary.expenses);

    let by_date = t.get_expenses(Some("2024-05-01"));
    assert_eq!(by_date.summary.expenses.len(), 1);
    assert_eq!(by_date.summary.expenses[0].expense.category, "Transportation");
}

#[test]
fn remove_uses_storage_position() {
    let mut t = tracker();
    t.add_expense("2024-05-02", "5", "Later", "Food");
    t.add_expense("2024-05-01", "7", "Earlier", "Food");

    let listed = t.get_expenses(None);
    let earlier = listed.summary.expenses[0].position;
    assert_eq!(earlier, 1);

    let report = t.remove_expense(earlier);
    assert!(report.error.is_none());
    assert_eq!(report.summary.expenses.len(), 1);
    assert_eq!(report.summary.expenses[0].expense.description, "Later");
    assert_eq!(report.summary.expenses[0].position, 0);
}

#[test]
fn invalid_date_is_reported() {
    let mut t = tracker();
    let report = t.add_expense("03/05/2024", "5", "x", "Food");
    assert!(report.error.is_some());
    assert!(report.summary.expenses.is_empty());

    let report = t.remove_expense(0);
    assert!(report.error.unwrap().contains("expense"));
}

#[test]
fn categories_are_seeded_once() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut t = Tracker::new(store, TrackerConfig::default()).unwrap();
    let cats = t.get_categories().categories;
    assert_eq!(cats.len(), 11);
    assert_eq!(cats[0], "Food");
    assert_eq!(cats[10], "Other");

    let report = t.add_category("  Hobbies ");
    assert!(report.error.is_none());
    assert_eq!(report.categories.last().unwrap(), "Hobbies");

    let t = Tracker::new(t.into_store(), TrackerConfig::default()).unwrap();
    assert_eq!(t.get_categories().categories.len(), 12);
}

#[test]
fn empty_category_is_rejected() {
    let mut t = tracker();
    let report = t.add_category("   ");
    assert!(report.error.is_some());
    assert_eq!(report.categories.len(), 11);
}

#[test]
fn update_replaces_the_whole_record() {
    let mut t = tracker();
    t.add_expense("2024-03-01", "50", "Groceries", "Food");
    let report = t.update_expense(0, "2024-03-02", "45.5", "Market", "Home");
    assert!(report.error.is_none());
    let e = &report.summary.expenses[0].expense;
    assert_eq!(e.date.to_string(), "2024-03-02");
    assert_eq!(e.amount, d("45.5"));
    assert_eq!(e.category, "Home");
    assert!(report.summary.overall.get("Food").is_none());

    assert!(t.update_expense(1, "2024-03-02", "1", "x", "Food").error.is_some());
}
