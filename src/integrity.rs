// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::TrackerResult;
use crate::loans::read_loans;
use crate::models::PaymentRow;
use crate::payments::{interest_baseline, read_payment_rows, replay_history};
use crate::store::TableStore;

/// Largest balance drift tolerated between a loan and its replayed history.
fn balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

/// Checks that every payment points at a loan and that every loan's balance
/// agrees with its payment history.
pub fn check_integrity<S: TableStore>(store: &S) -> TrackerResult<Vec<Issue>> {
    let loans = read_loans(store)?;
    let payments = read_payment_rows(store)?;
    let mut issues = Vec::new();

    for p in &payments {
        if p.payment.loan_index >= loans.len() {
            issues.push(Issue {
                kind: "dangling_payment",
                detail: format!(
                    "payment {} ({}) references loan {} of {}",
                    p.position,
                    p.payment.date,
                    p.payment.loan_index,
                    loans.len()
                ),
            });
        }
    }

    for (idx, loan) in loans.iter().enumerate() {
        let history: Vec<PaymentRow> = payments
            .iter()
            .filter(|p| p.payment.loan_index == idx)
            .cloned()
            .collect();
        let baseline = interest_baseline(loan, idx, &payments);
        let (replayed, _) = replay_history(loan, baseline, &history);
        let drift = (replayed.remaining_balance - loan.remaining_balance).abs();
        if drift > balance_tolerance() {
            issues.push(Issue {
                kind: "balance_drift",
                detail: format!(
                    "loan {}: stored {:.2}, history gives {:.2}",
                    idx, loan.remaining_balance, replayed.remaining_balance
                ),
            });
        }
        if loan.remaining_balance < Decimal::ZERO {
            issues.push(Issue {
                kind: "negative_balance",
                detail: format!("loan {}: {:.2}", idx, loan.remaining_balance),
            });
        }
    }
    Ok(issues)
}
