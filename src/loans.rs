// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::amortization::compute_amortization;
use crate::config::{IndefiniteInterest, ReconcileMode, TrackerConfig};
use crate::error::{TrackerResult, check_index};
use crate::models::{Loan, Payment, Term};
use crate::payments::replay_loan;
use crate::store::{LOANS, PAYMENTS, TableStore};

/// Caller-supplied loan terms; payment and interest are derived.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    pub total_amount: Decimal,
    pub apr: Decimal,
    pub term: Term,
    pub category: String,
    pub monthly_payment: Option<Decimal>,
}

pub fn read_loans<S: TableStore>(store: &S) -> TrackerResult<Vec<Loan>> {
    store
        .read_rows(LOANS.name)?
        .iter()
        .map(|r| Loan::from_row(r))
        .collect()
}

fn build_loan(terms: &LoanTerms, interest: IndefiniteInterest) -> TrackerResult<Loan> {
    let a = compute_amortization(
        terms.total_amount,
        terms.apr,
        terms.term,
        terms.monthly_payment,
        interest,
    )?;
    Ok(Loan {
        total_amount: terms.total_amount,
        apr: terms.apr,
        term: a.term,
        category: terms.category.clone(),
        monthly_payment: a.monthly_payment,
        total_interest: a.total_interest,
        remaining_balance: terms.total_amount,
    })
}

pub fn add_loan<S: TableStore>(
    store: &mut S,
    config: &TrackerConfig,
    terms: &LoanTerms,
) -> TrackerResult<Loan> {
    log::info!(
        "Adding loan {} at {}% over {} ({})",
        terms.total_amount,
        terms.apr,
        terms.term,
        terms.category
    );
    let loan = build_loan(terms, config.indefinite_on_add)?;
    store.ensure_table(&LOANS)?;
    store.append_row(LOANS.name, loan.to_row())?;
    Ok(loan)
}

/// Re-terms a loan. The balance starts over at the new total; in replay mode
/// the loan's recorded payments are then re-applied to the new terms.
pub fn update_loan<S: TableStore>(
    store: &mut S,
    config: &TrackerConfig,
    index: usize,
    terms: &LoanTerms,
) -> TrackerResult<Loan> {
    log::info!("Updating loan {} to {:?}", index, terms);
    let loan = build_loan(terms, config.indefinite_on_update)?;
    store.atomically(|s| {
        let len = s.read_rows(LOANS.name)?.len();
        check_index("loan", index, len)?;
        s.update_row(LOANS.name, index, loan.to_row())?;
        match config.reconcile {
            ReconcileMode::Replay => replay_loan(s, index, Some(loan.total_interest)),
            ReconcileMode::InPlace => Ok(loan.clone()),
        }
    })
}

/// Deletes a loan. Payments on it are dropped and payments on later loans
/// have their loan index shifted down so they keep pointing at the same loan.
pub fn remove_loan<S: TableStore>(store: &mut S, index: usize) -> TrackerResult<Loan> {
    log::info!("Removing loan at index {}", index);
    store.atomically(|s| {
        let loans = read_loans(s)?;
        check_index("loan", index, loans.len())?;
        s.delete_row(LOANS.name, index)?;

        let rows = s.read_rows(PAYMENTS.name)?;
        let mut dropped = 0usize;
        let mut shifted = 0usize;
        for (position, row) in rows.iter().enumerate().rev() {
            let mut payment = Payment::from_row(row)?;
            if payment.loan_index == index {
                s.delete_row(PAYMENTS.name, position)?;
                dropped += 1;
            } else if payment.loan_index > index {
                payment.loan_index -= 1;
                s.update_cells(PAYMENTS.name, position, 0, vec![payment.loan_index.to_string()])?;
                shifted += 1;
            }
        }
        if dropped + shifted > 0 {
            log::info!(
                "Loan {} removed: dropped {} payments, re-pointed {}",
                index,
                dropped,
                shifted
            );
        }
        Ok(loans[index].clone())
    })
}
