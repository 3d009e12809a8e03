// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use loanbook::config::TrackerConfig;
use loanbook::store::SqliteStore;
use loanbook::tracker::Tracker;
use loanbook::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let config = TrackerConfig::load(&conn)?;
    let mut tracker = Tracker::new(SqliteStore::new(conn)?, config)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("expense", sub)) => commands::expenses::handle(&mut tracker, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut tracker, sub)?,
        Some(("loan", sub)) => commands::loans::handle(&mut tracker, sub)?,
        Some(("payment", sub)) => commands::payments::handle(&mut tracker, sub)?,
        Some(("overview", sub)) => commands::payments::overview(&tracker, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut tracker, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&tracker, sub)?,
        Some(("config", sub)) => commands::settings::handle(tracker.store().conn(), sub)?,
        Some(("doctor", _)) => commands::doctor::handle(tracker.store())?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
