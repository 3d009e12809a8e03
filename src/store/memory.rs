// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use super::{StoreResult, TableSchema, TableStore};
use crate::error::{StoreError, TrackerResult};
use crate::models::Row;

#[derive(Debug, Clone, Default)]
struct MemTable {
    header: Row,
    rows: Vec<Row>,
}

/// Non-persistent store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, MemTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, name: &str) -> StoreResult<&MemTable> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> StoreResult<&mut MemTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    /// Creates or replaces a table with arbitrary rows.
    pub fn insert_table(&mut self, name: &str, header: Row, rows: Vec<Row>) {
        self.tables
            .insert(name.to_string(), MemTable { header, rows });
    }
}

fn out_of_range(name: &str, position: usize) -> StoreError {
    StoreError::RowOutOfRange {
        table: name.to_string(),
        position,
    }
}

impl TableStore for MemoryStore {
    fn has_table(&self, name: &str) -> StoreResult<bool> {
        Ok(self.tables.contains_key(name))
    }

    fn ensure_table(&mut self, schema: &TableSchema) -> StoreResult<()> {
        if !self.tables.contains_key(schema.name) {
            log::info!("Creating table {}", schema.name);
            self.insert_table(schema.name, schema.header_row(), schema.seed_rows());
        }
        Ok(())
    }

    fn header(&self, name: &str) -> StoreResult<Row> {
        Ok(self.table(name)?.header.clone())
    }

    fn append_row(&mut self, name: &str, row: Row) -> StoreResult<()> {
        self.table_mut(name)?.rows.push(row);
        Ok(())
    }

    fn read_rows(&self, name: &str) -> StoreResult<Vec<Row>> {
        Ok(self.table(name)?.rows.clone())
    }

    fn update_row(&mut self, name: &str, position: usize, row: Row) -> StoreResult<()> {
        let slot = self
            .table_mut(name)?
            .rows
            .get_mut(position)
            .ok_or_else(|| out_of_range(name, position))?;
        *slot = row;
        Ok(())
    }

    fn delete_row(&mut self, name: &str, position: usize) -> StoreResult<()> {
        let rows = &mut self.table_mut(name)?.rows;
        if position >= rows.len() {
            return Err(out_of_range(name, position));
        }
        rows.remove(position);
        Ok(())
    }

    fn atomically<T, F>(&mut self, f: F) -> TrackerResult<T>
    where
        F: FnOnce(&mut Self) -> TrackerResult<T>,
    {
        let snapshot = self.tables.clone();
        let res = f(self);
        if res.is_err() {
            self.tables = snapshot;
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::store::{CATEGORIES, EXPENSES};

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn ensure_table_seeds_once() {
        let mut store = MemoryStore::new();
        store.ensure_table(&CATEGORIES).unwrap();
        store.append_row("Categories", row(&["Books"])).unwrap();
        store.ensure_table(&CATEGORIES).unwrap();
        let rows = store.read_rows("Categories").unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0], row(&["Food"]));
        assert_eq!(rows[11], row(&["Books"]));
    }

    #[test]
    fn failed_unit_restores_tables() {
        let mut store = MemoryStore::new();
        store.ensure_table(&EXPENSES).unwrap();
        let res: TrackerResult<()> = store.atomically(|s| {
            s.append_row("Expenses", row(&["2024-01-01", "1", "x", "Food"]))?;
            Err(TrackerError::invalid_input("boom"))
        });
        assert!(res.is_err());
        assert!(store.read_rows("Expenses").unwrap().is_empty());
    }

    #[test]
    fn update_cells_pads_short_rows() {
        let mut store = MemoryStore::new();
        store.insert_table("T", row(&["a", "b", "c"]), vec![row(&["1"])]);
        store.update_cells("T", 0, 2, row(&["z"])).unwrap();
        assert_eq!(store.read_rows("T").unwrap()[0], row(&["1", "", "z"]));
        assert!(store.update_cells("T", 1, 0, row(&["q"])).is_err());
    }
}
