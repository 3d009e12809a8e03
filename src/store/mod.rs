// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tabular record storage.
//!
//! Tables are ordered lists of text rows behind a fixed header. A row's
//! 0-based position among the data rows is its only identity; deleting a
//! row shifts every later row up by one.

pub mod memory;
pub mod sqlite;

use crate::error::{StoreError, TrackerResult};
use crate::models::Row;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Header and seed rows used when a table is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub header: &'static [&'static str],
    pub seed: &'static [&'static str],
}

pub const EXPENSES: TableSchema = TableSchema {
    name: "Expenses",
    header: &["Date", "Amount", "Description", "Category"],
    seed: &[],
};

pub const CATEGORIES: TableSchema = TableSchema {
    name: "Categories",
    header: &["Category"],
    seed: &[
        "Food",
        "Gifts",
        "Health/Medical",
        "Home",
        "Transportation",
        "Personal",
        "Pets",
        "Utilities",
        "Travel",
        "Debt",
        "Other",
    ],
};

pub const LOANS: TableSchema = TableSchema {
    name: "Loans",
    header: &[
        "Total Amount",
        "APR",
        "Term",
        "Category",
        "Monthly Payment",
        "Total Interest",
        "Remaining Balance",
    ],
    seed: &[],
};

pub const PAYMENTS: TableSchema = TableSchema {
    name: "Payments",
    header: &[
        "Loan Index",
        "Date",
        "Amount",
        "Principal",
        "Interest",
        "Remaining Balance",
        "Payments Left",
    ],
    seed: &[],
};

/// Flat loan rows from before the Loans table existed.
pub const LEGACY: TableSchema = TableSchema {
    name: "Sheet1",
    header: &["Total Amount", "APR", "Term", "Category"],
    seed: &[],
};

impl TableSchema {
    pub fn header_row(&self) -> Row {
        self.header.iter().map(|h| h.to_string()).collect()
    }

    /// Seed values become single-cell rows.
    pub fn seed_rows(&self) -> Vec<Row> {
        self.seed.iter().map(|s| vec![s.to_string()]).collect()
    }
}

/// Row-level CRUD over named tables.
pub trait TableStore {
    fn has_table(&self, name: &str) -> StoreResult<bool>;

    /// Creates the table with its header and seed rows if it is absent.
    fn ensure_table(&mut self, schema: &TableSchema) -> StoreResult<()>;

    fn header(&self, name: &str) -> StoreResult<Row>;

    fn append_row(&mut self, name: &str, row: Row) -> StoreResult<()>;

    /// Data rows in position order, header excluded.
    fn read_rows(&self, name: &str) -> StoreResult<Vec<Row>>;

    fn update_row(&mut self, name: &str, position: usize, row: Row) -> StoreResult<()>;

    fn delete_row(&mut self, name: &str, position: usize) -> StoreResult<()>;

    /// Overwrites `cells.len()` cells starting at column `start`, padding the
    /// row with empty cells if it is shorter.
    fn update_cells(
        &mut self,
        name: &str,
        position: usize,
        start: usize,
        cells: Row,
    ) -> StoreResult<()> {
        let mut row = self
            .read_rows(name)?
            .into_iter()
            .nth(position)
            .ok_or_else(|| StoreError::RowOutOfRange {
                table: name.to_string(),
                position,
            })?;
        if row.len() < start + cells.len() {
            row.resize(start + cells.len(), String::new());
        }
        for (i, c) in cells.into_iter().enumerate() {
            row[start + i] = c;
        }
        self.update_row(name, position, row)
    }

    /// Runs `f` as one unit: if it fails, every table is left as it was.
    fn atomically<T, F>(&mut self, f: F) -> TrackerResult<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> TrackerResult<T>;
}
