// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::ensure_ok;
use crate::commands::loans::loan_table;
use crate::models::PaymentRow;
use crate::store::TableStore;
use crate::tracker::Tracker;
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: TableStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let loan = *sub.get_one::<usize>("loan").unwrap();
            let date = sub.get_one::<String>("date").unwrap();
            let amount = sub.get_one::<String>("amount").unwrap();
            let report = tracker.add_payment(loan, date, amount);
            ensure_ok(&report.error)?;
            if let Some(l) = report.loans.get(loan) {
                println!(
                    "Paid {} on loan {}; balance now {}",
                    amount.trim(),
                    loan,
                    fmt_amount(&l.remaining_balance)
                );
            }
        }
        Some(("update", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap();
            let loan = *sub.get_one::<usize>("loan").unwrap();
            let date = sub.get_one::<String>("date").unwrap();
            let amount = sub.get_one::<String>("amount").unwrap();
            let report = tracker.update_payment(index, loan, date, amount);
            ensure_ok(&report.error)?;
            println!("Updated payment {}", index);
        }
        Some(("rm", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap();
            let report = tracker.remove_payment(index);
            ensure_ok(&report.error)?;
            println!("Removed payment {}", index);
        }
        Some(("list", sub)) => {
            let report = tracker.get_initial_data();
            ensure_ok(&report.error)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report.payments)? {
                println!("{}", payment_table(&report.payments));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Loans followed by all payments, oldest first.
pub fn overview<S: TableStore>(tracker: &Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    let report = tracker.get_initial_data();
    ensure_ok(&report.error)?;
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)? {
        println!("{}", loan_table(&report.loans));
        println!("{}", payment_table(&report.payments));
    }
    Ok(())
}

pub fn payment_table(payments: &[PaymentRow]) -> comfy_table::Table {
    let rows = payments
        .iter()
        .map(|r| {
            let p = &r.payment;
            vec![
                r.position.to_string(),
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
    pretty_table(
        &[
            "#", "Loan", "Date", "Amount", "Principal", "Interest", "Balance", "Left",
        ],
        rows,
    )
}
