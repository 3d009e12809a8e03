// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::ensure_ok;
use crate::models::Loan;
use crate::store::TableStore;
use crate::tracker::{LoanInput, Tracker};
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: TableStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let report = tracker.add_loan(loan_input(sub));
            ensure_ok(&report.error)?;
            if let Some(loan) = report.loans.last() {
                println!(
                    "Added loan {}: {} per month, {} total interest",
                    report.loans.len() - 1,
                    fmt_amount(&loan.monthly_payment),
                    fmt_amount(&loan.total_interest)
                );
            }
        }
        Some(("update", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap();
            let report = tracker.update_loan(index, loan_input(sub));
            ensure_ok(&report.error)?;
            println!("Updated loan {}", index);
        }
        Some(("rm", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap();
            let report = tracker.remove_loan(index);
            ensure_ok(&report.error)?;
            println!("Removed loan {}", index);
        }
        Some(("list", sub)) => {
            let report = tracker.get_loans();
            ensure_ok(&report.error)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report.loans)? {
                println!("{}", loan_table(&report.loans));
            }
        }
        _ => {}
    }
    Ok(())
}

fn loan_input(sub: &clap::ArgMatches) -> LoanInput<'_> {
    LoanInput {
        total_amount: sub.get_one::<String>("amount").unwrap(),
        apr: sub.get_one::<String>("apr").unwrap(),
        term: sub.get_one::<String>("term").unwrap(),
        category: sub.get_one::<String>("category").unwrap(),
        monthly_payment: sub.get_one::<String>("payment").map(|s| s.as_str()),
    }
}

pub fn loan_table(loans: &[Loan]) -> comfy_table::Table {
    let rows = loans
        .iter()
        .enumerate()
        .map(|(i, l)| {
            vec![
                i.to_string(),
                fmt_amount(&l.total_amount),
                format!("{}%", l.apr),
                l.term.to_string(),
                l.category.clone(),
                fmt_amount(&l.monthly_payment),
                fmt_amount(&l.total_interest),
                fmt_amount(&l.remaining_balance),
            ]
        })
        .collect();
    pretty_table(
        &[
            "#", "Total", "APR", "Term", "Category", "Monthly", "Interest", "Balance",
        ],
        rows,
    )
}
