// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::ensure_ok;
use crate::store::TableStore;
use crate::tracker::Tracker;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: TableStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let report = tracker.add_category(name);
            ensure_ok(&report.error)?;
            println!("Added category '{}'", name.trim());
        }
        Some(("list", sub)) => {
            let report = tracker.get_categories();
            ensure_ok(&report.error)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report.categories)?
            {
                let data = report.categories.into_iter().map(|c| vec![c]).collect();
                println!("{}", pretty_table(&["Category"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
