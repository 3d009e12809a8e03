// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::ensure_ok;
use crate::store::TableStore;
use crate::tracker::Tracker;
use crate::utils::fmt_amount;
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<S: TableStore>(tracker: &Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    let table = m.get_one::<String>("table").unwrap().as_str();
    let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
    let out = m.get_one::<String>("out").unwrap();

    let (header, rows, json) = match table {
        "expenses" => {
            let report = tracker.get_expenses(None);
            ensure_ok(&report.error)?;
            let data = &report.summary.expenses;
            let rows: Vec<Vec<String>> = data
                .iter()
                .map(|r| {
                    vec![
                        r.expense.date.to_string(),
                        fmt_amount(&r.expense.amount),
                        r.expense.description.clone(),
                        r.expense.category.clone(),
                    ]
                })
                .collect();
            (
                vec!["date", "amount", "description", "category"],
                rows,
                to_json(data)?,
            )
        }
        "loans" => {
            let report = tracker.get_initial_data();
            ensure_ok(&report.error)?;
            let rows: Vec<Vec<String>> = report
                .loans
                .iter()
                .enumerate()
                .map(|(i, l)| {
                    vec![
                        i.to_string(),
                        fmt_amount(&l.total_amount),
                        l.apr.to_string(),
                        l.term.to_string(),
                        l.category.clone(),
                        fmt_amount(&l.monthly_payment),
                        fmt_amount(&l.total_interest),
                        fmt_amount(&l.remaining_balance),
                    ]
                })
                .collect();
            (
                vec![
                    "index",
                    "total_amount",
                    "apr",
                    "term",
                    "category",
                    "monthly_payment",
                    "total_interest",
                    "remaining_balance",
                ],
                rows,
                to_json(&report.loans)?,
            )
        }
        "payments" => {
            let report = tracker.get_initial_data();
            ensure_ok(&report.error)?;
            let rows: Vec<Vec<String>> = report
                .payments
                .iter()
                .map(|r| {
                    let p = &r.payment;
                    vec![
                        p.loan_index.to_string(),
                        p.date.to_string(),
                        fmt_amount(&p.amount),
                        fmt_amount(&p.principal_paid),
                        fmt_amount(&p.interest_paid),
                        fmt_amount(&p.remaining_balance_after),
                        p.payments_left.to_string(),
                    ]
                })
                .collect();
            (
                vec![
                    "loan_index",
                    "date",
                    "amount",
                    "principal_paid",
                    "interest_paid",
                    "remaining_balance_after",
                    "payments_left",
                ],
                rows,
                to_json(&report.payments)?,
            )
        }
        other => bail!("Unknown table: {} (use expenses|loans|payments)", other),
    };

    match fmt.as_str() {
        "csv" => write_csv(out, &header, rows)?,
        "json" => std::fs::write(out, json)?,
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    log::info!("Exported {} to {} as {}", table, out, fmt);
    println!("Exported {} to {}", table, out);
    Ok(())
}

fn to_json<T: Serialize>(v: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(v)?)
}

fn write_csv(out: &str, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
