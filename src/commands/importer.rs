// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::commands::ensure_ok;
use crate::store::TableStore;
use crate::tracker::Tracker;
use anyhow::Result;

pub fn handle<S: TableStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    let report = match m.subcommand() {
        Some(("legacy", _)) => tracker.import_legacy_table(),
        Some(("csv", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            tracker.import_legacy_csv(Path::new(path))
        }
        _ => return Ok(()),
    };
    ensure_ok(&report.error)?;
    println!(
        "Imported {} loans ({} total)",
        report.imported,
        report.loans.len()
    );
    Ok(())
}
