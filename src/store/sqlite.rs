// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};

use super::{StoreResult, TableSchema, TableStore};
use crate::db;
use crate::error::{StoreError, TrackerResult};
use crate::models::Row;

/// Tables kept in SQLite. Rows are JSON-encoded cell arrays in `sheet_rows`;
/// a row's position is its rank by rowid within its sheet.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> StoreResult<Self> {
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn row_id(&self, name: &str, position: usize) -> StoreResult<i64> {
        if !self.has_table(name)? {
            return Err(StoreError::UnknownTable(name.to_string()));
        }
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM sheet_rows WHERE sheet=?1 ORDER BY id LIMIT 1 OFFSET ?2",
                params![name, position as i64],
                |r| r.get(0),
            )
            .optional()?;
        id.ok_or_else(|| StoreError::RowOutOfRange {
            table: name.to_string(),
            position,
        })
    }

    fn require(&self, name: &str) -> StoreResult<()> {
        if self.has_table(name)? {
            Ok(())
        } else {
            Err(StoreError::UnknownTable(name.to_string()))
        }
    }
}

impl TableStore for SqliteStore {
    fn has_table(&self, name: &str) -> StoreResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM sheets WHERE name=?1", params![name], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn ensure_table(&mut self, schema: &TableSchema) -> StoreResult<()> {
        if self.has_table(schema.name)? {
            return Ok(());
        }
        log::info!("Creating table {}", schema.name);
        let tx = self.conn.savepoint()?;
        tx.execute(
            "INSERT INTO sheets(name, header) VALUES (?1, ?2)",
            params![schema.name, serde_json::to_string(&schema.header_row())?],
        )?;
        for row in schema.seed_rows() {
            tx.execute(
                "INSERT INTO sheet_rows(sheet, cells) VALUES (?1, ?2)",
                params![schema.name, serde_json::to_string(&row)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn header(&self, name: &str) -> StoreResult<Row> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT header FROM sheets WHERE name=?1",
                params![name],
                |r| r.get(0),
            )
            .optional()?;
        let raw = raw.ok_or_else(|| StoreError::UnknownTable(name.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn append_row(&mut self, name: &str, row: Row) -> StoreResult<()> {
        self.require(name)?;
        self.conn.execute(
            "INSERT INTO sheet_rows(sheet, cells) VALUES (?1, ?2)",
            params![name, serde_json::to_string(&row)?],
        )?;
        Ok(())
    }

    fn read_rows(&self, name: &str) -> StoreResult<Vec<Row>> {
        self.require(name)?;
        let mut stmt = self
            .conn
            .prepare_cached("SELECT cells FROM sheet_rows WHERE sheet=?1 ORDER BY id")?;
        let mut cur = stmt.query(params![name])?;
        let mut rows = Vec::new();
        while let Some(r) = cur.next()? {
            let cells: String = r.get(0)?;
            rows.push(serde_json::from_str(&cells)?);
        }
        Ok(rows)
    }

    fn update_row(&mut self, name: &str, position: usize, row: Row) -> StoreResult<()> {
        let id = self.row_id(name, position)?;
        self.conn.execute(
            "UPDATE sheet_rows SET cells=?1 WHERE id=?2",
            params![serde_json::to_string(&row)?, id],
        )?;
        Ok(())
    }

    fn delete_row(&mut self, name: &str, position: usize) -> StoreResult<()> {
        let id = self.row_id(name, position)?;
        self.conn
            .execute("DELETE FROM sheet_rows WHERE id=?1", params![id])?;
        Ok(())
    }

    fn atomically<T, F>(&mut self, f: F) -> TrackerResult<T>
    where
        F: FnOnce(&mut Self) -> TrackerResult<T>,
    {
        self.conn.execute_batch("SAVEPOINT loanbook_op")?;
        match f(self) {
            Ok(v) => {
                self.conn.execute_batch("RELEASE loanbook_op")?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rb) = self
                    .conn
                    .execute_batch("ROLLBACK TO loanbook_op; RELEASE loanbook_op")
                {
                    log::error!("Rollback failed after '{}': {}", e, rb);
                }
                Err(e)
            }
        }
    }
}
