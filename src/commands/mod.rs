// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod importer;
pub mod loans;
pub mod payments;
pub mod settings;

use anyhow::{Result, anyhow};

/// Turns a report's `error` into a command failure.
pub fn ensure_ok(error: &Option<String>) -> Result<()> {
    match error {
        Some(e) => Err(anyhow!(e.clone())),
        None => Ok(()),
    }
}
