// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::ensure_ok;
use crate::expenses::ExpenseSummary;
use crate::store::TableStore;
use crate::tracker::Tracker;
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: TableStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(tracker, sub)?,
        Some(("update", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap();
            let report = tracker.update_expense(
                index,
                sub.get_one::<String>("date").unwrap(),
                sub.get_one::<String>("amount").unwrap(),
                sub.get_one::<String>("description").unwrap(),
                sub.get_one::<String>("category").unwrap(),
            );
            ensure_ok(&report.error)?;
            println!("Updated expense {}", index);
        }
        Some(("list", sub)) => list(tracker, sub)?,
        Some(("rm", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap();
            let report = tracker.remove_expense(index);
            ensure_ok(&report.error)?;
            println!("Removed expense {}", index);
        }
        Some(("summary", sub)) => summary(tracker, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: TableStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let date = sub.get_one::<String>("date").unwrap();
    let amount = sub.get_one::<String>("amount").unwrap();
    let description = sub.get_one::<String>("description").unwrap();
    let category = sub.get_one::<String>("category").unwrap();
    let report = tracker.add_expense(date, amount, description, category);
    ensure_ok(&report.error)?;
    println!(
        "Recorded {} on {} for '{}' ({})",
        amount.trim(),
        date.trim(),
        description,
        category.trim()
    );
    Ok(())
}

fn list<S: TableStore>(tracker: &Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let search = sub.get_one::<String>("search").map(|s| s.as_str());
    let report = tracker.get_expenses(search);
    ensure_ok(&report.error)?;
    let data = &report.summary.expenses;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.position.to_string(),
                    r.expense.date.to_string(),
                    fmt_amount(&r.expense.amount),
                    r.expense.description.clone(),
                    r.expense.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["#", "Date", "Amount", "Description", "Category"], rows)
        );
    }
    Ok(())
}

pub fn summary_rows(summary: &ExpenseSummary) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for month in &summary.monthly {
        for (cat, amt) in &month.by_category {
            rows.push(vec![month.month.clone(), cat.clone(), fmt_amount(amt)]);
        }
    }
    for (cat, amt) in &summary.overall {
        rows.push(vec!["All time".to_string(), cat.clone(), fmt_amount(amt)]);
    }
    rows
}

fn summary<S: TableStore>(tracker: &Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let search = sub.get_one::<String>("search").map(|s| s.as_str());
    let report = tracker.get_expenses(search);
    ensure_ok(&report.error)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{}",
            pretty_table(&["Month", "Category", "Spent"], summary_rows(&report.summary))
        );
    }
    Ok(())
}
