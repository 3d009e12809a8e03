// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{TrackerResult, check_index};
use crate::models::{Expense, ExpenseRow};
use crate::store::{CATEGORIES, EXPENSES, TableStore};
use crate::utils::month_label;

pub fn add_expense<S: TableStore>(store: &mut S, expense: &Expense) -> TrackerResult<()> {
    log::info!(
        "Adding expense {} {} '{}' ({})",
        expense.date,
        expense.amount,
        expense.description,
        expense.category
    );
    store.ensure_table(&EXPENSES)?;
    store.append_row(EXPENSES.name, expense.to_row())?;
    Ok(())
}

fn matches(row: &ExpenseRow, needle: &str) -> bool {
    row.expense.date.to_string().contains(needle)
        || row.expense.description.to_lowercase().contains(needle)
        || row.expense.category.to_lowercase().contains(needle)
}

/// Expenses in ascending date order, optionally filtered by a
/// case-insensitive substring of the rendered date, description or category.
pub fn read_expenses<S: TableStore>(
    store: &S,
    search: Option<&str>,
) -> TrackerResult<Vec<ExpenseRow>> {
    let mut rows = store
        .read_rows(EXPENSES.name)?
        .iter()
        .enumerate()
        .map(|(position, row)| {
            Ok(ExpenseRow {
                position,
                expense: Expense::from_row(row)?,
            })
        })
        .collect::<TrackerResult<Vec<_>>>()?;

    if let Some(needle) = search.map(str::to_lowercase).filter(|s| !s.is_empty()) {
        rows.retain(|r| matches(r, &needle));
    }
    rows.sort_by_key(|r| r.expense.date);
    log::debug!("Read {} expenses", rows.len());
    Ok(rows)
}

pub fn remove_expense<S: TableStore>(store: &mut S, position: usize) -> TrackerResult<()> {
    log::info!("Removing expense at position {}", position);
    let len = store.read_rows(EXPENSES.name)?.len();
    check_index("expense", position, len)?;
    store.delete_row(EXPENSES.name, position)?;
    Ok(())
}

/// Replaces the expense at `position` with `expense`.
pub fn update_expense<S: TableStore>(
    store: &mut S,
    position: usize,
    expense: &Expense,
) -> TrackerResult<()> {
    log::info!("Updating expense at position {}", position);
    let len = store.read_rows(EXPENSES.name)?.len();
    check_index("expense", position, len)?;
    store.update_row(EXPENSES.name, position, expense.to_row())?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub month: String,
    pub by_category: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub expenses: Vec<ExpenseRow>,
    /// Chronological, one entry per calendar month present.
    pub monthly: Vec<MonthlyTotals>,
    pub overall: BTreeMap<String, Decimal>,
}

impl ExpenseSummary {
    /// Totals for a month label such as "March 2024".
    pub fn month(&self, label: &str) -> Option<&BTreeMap<String, Decimal>> {
        self.monthly
            .iter()
            .find(|m| m.month == label)
            .map(|m| &m.by_category)
    }
}

pub fn summarize(expenses: Vec<ExpenseRow>) -> ExpenseSummary {
    let mut monthly: BTreeMap<(i32, u32), MonthlyTotals> = BTreeMap::new();
    let mut overall: BTreeMap<String, Decimal> = BTreeMap::new();

    for row in &expenses {
        let e = &row.expense;
        let bucket = monthly
            .entry((e.date.year(), e.date.month()))
            .or_insert_with(|| MonthlyTotals {
                month: month_label(e.date),
                by_category: BTreeMap::new(),
            });
        *bucket
            .by_category
            .entry(e.category.clone())
            .or_insert(Decimal::ZERO) += e.amount;
        *overall.entry(e.category.clone()).or_insert(Decimal::ZERO) += e.amount;
    }

    ExpenseSummary {
        expenses,
        monthly: monthly.into_values().collect(),
        overall,
    }
}

pub fn expense_summary<S: TableStore>(
    store: &S,
    search: Option<&str>,
) -> TrackerResult<ExpenseSummary> {
    Ok(summarize(read_expenses(store, search)?))
}

pub fn read_categories<S: TableStore>(store: &S) -> TrackerResult<Vec<String>> {
    Ok(store
        .read_rows(CATEGORIES.name)?
        .into_iter()
        .filter_map(|r| r.into_iter().next())
        .collect())
}

pub fn add_category<S: TableStore>(store: &mut S, name: &str) -> TrackerResult<()> {
    log::info!("Adding category '{}'", name);
    store.ensure_table(&CATEGORIES)?;
    store.append_row(CATEGORIES.name, vec![name.to_string()])?;
    Ok(())
}
