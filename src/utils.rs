// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{TrackerError, TrackerResult};

/// Parses a `YYYY-MM-DD` date. Full RFC 3339 timestamps are accepted and
/// truncated to their calendar date.
pub fn parse_date(s: &str) -> TrackerResult<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| {
            TrackerError::invalid_input(format!("Invalid date '{}', expected YYYY-MM-DD", s))
        })
}

pub fn parse_decimal(s: &str) -> TrackerResult<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .map_err(|_| TrackerError::invalid_input(format!("Invalid decimal '{}'", s)))
}

/// Optional amounts: an empty string means "not supplied".
pub fn parse_optional_decimal(s: Option<&str>) -> TrackerResult<Option<Decimal>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_decimal(v).map(Some),
    }
}

/// Two-place rounding, half away from zero.
pub fn round_money(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn fmt_amount(d: &Decimal) -> String {
    format!("{:.2}", round_money(*d))
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
