// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-time import of flat loan rows (amount, APR, term, category) from the
//! legacy `Sheet1` table or a CSV file.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::loans::{LoanTerms, add_loan};
use crate::models::Row;
use crate::store::{LEGACY, TableStore};
use crate::utils::parse_decimal;

fn legacy_terms(row: &[String]) -> TrackerResult<LoanTerms> {
    let get = |i: usize, what: &str| {
        row.get(i).map(|s| s.trim()).ok_or_else(|| {
            TrackerError::invalid_input(format!("Legacy row is missing {}", what))
        })
    };
    Ok(LoanTerms {
        total_amount: parse_decimal(get(0, "total amount")?)?,
        apr: parse_decimal(get(1, "APR")?)?,
        term: get(2, "term")?.parse()?,
        category: get(3, "category")?.to_string(),
        monthly_payment: None,
    })
}

fn add_all<S: TableStore>(
    store: &mut S,
    config: &TrackerConfig,
    rows: &[Row],
) -> TrackerResult<usize> {
    store.atomically(|s| {
        for (i, row) in rows.iter().enumerate() {
            let terms = legacy_terms(row).map_err(|e| {
                TrackerError::invalid_input(format!("Legacy row {}: {}", i + 1, e))
            })?;
            add_loan(s, config, &terms)?;
        }
        Ok(rows.len())
    })
}

/// Imports every row of the legacy table, if there is one.
pub fn import_legacy_table<S: TableStore>(
    store: &mut S,
    config: &TrackerConfig,
) -> TrackerResult<usize> {
    if !store.has_table(LEGACY.name)? {
        log::info!("No legacy '{}' table found; nothing to import", LEGACY.name);
        return Ok(0);
    }
    let rows = store.read_rows(LEGACY.name)?;
    let n = add_all(store, config, &rows)?;
    log::info!("Initialized {} loans from '{}'", n, LEGACY.name);
    Ok(n)
}

/// Imports loans from a CSV file with a header line. Either every row is
/// imported or none are.
pub fn import_legacy_csv<S: TableStore>(
    store: &mut S,
    config: &TrackerConfig,
    path: &Path,
) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;
    let mut rows = Vec::new();
    for result in rdr.records() {
        let rec = result.with_context(|| format!("Read CSV {}", path.display()))?;
        rows.push(rec.iter().map(|c| c.to_string()).collect::<Row>());
    }
    let n = add_all(store, config, &rows)?;
    log::info!("Imported {} loans from {}", n, path.display());
    Ok(n)
}
