// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Row encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Table '{0}' does not exist")]
    UnknownTable(String),

    #[error("Row {position} is out of range for table '{table}'")]
    RowOutOfRange { table: String, position: usize },
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid {kind} index {index} (have {len})")]
    InvalidReference {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TrackerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        TrackerError::InvalidInput(msg.into())
    }
}

impl From<rusqlite::Error> for TrackerError {
    fn from(e: rusqlite::Error) -> Self {
        TrackerError::Store(StoreError::Database(e))
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Fails with `InvalidReference` unless `index` addresses one of `len` rows.
pub fn check_index(kind: &'static str, index: usize, len: usize) -> TrackerResult<()> {
    if index >= len {
        return Err(TrackerError::InvalidReference { kind, index, len });
    }
    Ok(())
}
