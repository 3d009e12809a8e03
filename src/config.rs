// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::{TrackerError, TrackerResult};

/// How total interest is estimated for a loan with no fixed term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndefiniteInterest {
    /// Project the monthly payment over 360 months, floored at zero.
    Projected360,
    Zero,
}

/// How edits and removals of payments bring the loan back in line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Recompute the loan from its full payment history.
    Replay,
    /// Adjust the running balance against the loan's current state only.
    InPlace,
}

impl fmt::Display for IndefiniteInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndefiniteInterest::Projected360 => "projected360",
            IndefiniteInterest::Zero => "zero",
        })
    }
}

impl FromStr for IndefiniteInterest {
    type Err = TrackerError;

    fn from_str(s: &str) -> TrackerResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projected360" | "projected" => Ok(IndefiniteInterest::Projected360),
            "zero" => Ok(IndefiniteInterest::Zero),
            other => Err(TrackerError::invalid_input(format!(
                "Unknown indefinite interest mode '{}' (use projected360|zero)",
                other
            ))),
        }
    }
}

impl fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReconcileMode::Replay => "replay",
            ReconcileMode::InPlace => "in_place",
        })
    }
}

impl FromStr for ReconcileMode {
    type Err = TrackerError;

    fn from_str(s: &str) -> TrackerResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replay" => Ok(ReconcileMode::Replay),
            "in_place" | "in-place" | "inplace" => Ok(ReconcileMode::InPlace),
            other => Err(TrackerError::invalid_input(format!(
                "Unknown reconcile mode '{}' (use replay|in_place)",
                other
            ))),
        }
    }
}

pub const KEY_INDEFINITE_ON_ADD: &str = "indefinite_on_add";
pub const KEY_INDEFINITE_ON_UPDATE: &str = "indefinite_on_update";
pub const KEY_RECONCILE: &str = "reconcile";

pub const KEYS: [&str; 3] = [KEY_INDEFINITE_ON_ADD, KEY_INDEFINITE_ON_UPDATE, KEY_RECONCILE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerConfig {
    pub indefinite_on_add: IndefiniteInterest,
    pub indefinite_on_update: IndefiniteInterest,
    pub reconcile: ReconcileMode,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            indefinite_on_add: IndefiniteInterest::Projected360,
            indefinite_on_update: IndefiniteInterest::Zero,
            reconcile: ReconcileMode::Replay,
        }
    }
}

impl TrackerConfig {
    /// Reads overrides from the settings table; absent keys keep defaults.
    pub fn load(conn: &Connection) -> TrackerResult<Self> {
        let mut cfg = Self::default();
        if let Some(v) = get_setting(conn, KEY_INDEFINITE_ON_ADD)? {
            cfg.indefinite_on_add = v.parse()?;
        }
        if let Some(v) = get_setting(conn, KEY_INDEFINITE_ON_UPDATE)? {
            cfg.indefinite_on_update = v.parse()?;
        }
        if let Some(v) = get_setting(conn, KEY_RECONCILE)? {
            cfg.reconcile = v.parse()?;
        }
        Ok(cfg)
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (KEY_INDEFINITE_ON_ADD, self.indefinite_on_add.to_string()),
            (KEY_INDEFINITE_ON_UPDATE, self.indefinite_on_update.to_string()),
            (KEY_RECONCILE, self.reconcile.to_string()),
        ]
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> TrackerResult<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Validates `value` for `key` and stores its normalized form.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> TrackerResult<String> {
    let normalized = match key {
        KEY_INDEFINITE_ON_ADD | KEY_INDEFINITE_ON_UPDATE => {
            value.parse::<IndefiniteInterest>()?.to_string()
        }
        KEY_RECONCILE => value.parse::<ReconcileMode>()?.to_string(),
        other => {
            return Err(TrackerError::invalid_input(format!(
                "Unknown setting '{}' (known: {})",
                other,
                KEYS.join(", ")
            )));
        }
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalized],
    )?;
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn defaults_preserve_both_indefinite_behaviors() {
        let cfg = TrackerConfig::load(&conn()).unwrap();
        assert_eq!(cfg.indefinite_on_add, IndefiniteInterest::Projected360);
        assert_eq!(cfg.indefinite_on_update, IndefiniteInterest::Zero);
        assert_eq!(cfg.reconcile, ReconcileMode::Replay);
    }

    #[test]
    fn set_setting_normalizes_and_persists() {
        let conn = conn();
        assert_eq!(set_setting(&conn, "reconcile", " In-Place ").unwrap(), "in_place");
        let cfg = TrackerConfig::load(&conn).unwrap();
        assert_eq!(cfg.reconcile, ReconcileMode::InPlace);
    }

    #[test]
    fn set_setting_rejects_unknown_keys_and_values() {
        let conn = conn();
        assert!(set_setting(&conn, "base_currency", "USD").is_err());
        assert!(set_setting(&conn, "indefinite_on_add", "sometimes").is_err());
        assert_eq!(get_setting(&conn, "indefinite_on_add").unwrap(), None);
    }
}
