// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Payment ledger. Every payment references its loan by the loan's row
//! position and carries the interest/principal split computed when it was
//! last reconciled.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::amortization::split_payment;
use crate::config::ReconcileMode;
use crate::error::{TrackerResult, check_index};
use crate::loans::read_loans;
use crate::models::{Loan, Payment, PaymentRow};
use crate::store::{LOANS, PAYMENTS, TableStore};
use crate::utils::{fmt_amount, round_money};

/// Payments in storage order; index `i` is the row at position `i`.
pub fn read_payment_rows<S: TableStore>(store: &S) -> TrackerResult<Vec<PaymentRow>> {
    store
        .read_rows(PAYMENTS.name)?
        .iter()
        .enumerate()
        .map(|(position, row)| {
            Ok(PaymentRow {
                position,
                payment: Payment::from_row(row)?,
            })
        })
        .collect()
}

/// Payments in ascending date order, ties kept in storage order.
pub fn read_payments<S: TableStore>(store: &S) -> TrackerResult<Vec<PaymentRow>> {
    let mut rows = read_payment_rows(store)?;
    rows.sort_by_key(|r| r.payment.date);
    Ok(rows)
}

fn loan_at(loans: &[Loan], index: usize) -> TrackerResult<&Loan> {
    check_index("loan", index, loans.len())?;
    Ok(&loans[index])
}

fn write_loan_totals<S: TableStore>(
    store: &mut S,
    loan_index: usize,
    total_interest: Decimal,
    remaining_balance: Decimal,
) -> TrackerResult<()> {
    store.update_cells(
        LOANS.name,
        loan_index,
        5,
        vec![fmt_amount(&total_interest), fmt_amount(&remaining_balance)],
    )?;
    Ok(())
}

fn write_loan_balance<S: TableStore>(
    store: &mut S,
    loan_index: usize,
    remaining_balance: Decimal,
) -> TrackerResult<()> {
    store.update_cells(LOANS.name, loan_index, 6, vec![fmt_amount(&remaining_balance)])?;
    Ok(())
}

/// Records a payment against the loan's current balance and advances the
/// loan's balance and accumulated interest. In replay mode a payment dated
/// before the loan's latest payment is slotted into the history by date and
/// the loan is replayed, so the stored balance always matches a replay.
pub fn apply_payment<S: TableStore>(
    store: &mut S,
    mode: ReconcileMode,
    loan_index: usize,
    date: NaiveDate,
    amount: Decimal,
) -> TrackerResult<Payment> {
    log::info!(
        "Adding payment of {} on {} to loan {}",
        amount,
        date,
        loan_index
    );
    let amount = round_money(amount);
    store.atomically(|s| {
        let loans = read_loans(s)?;
        let loan = loan_at(&loans, loan_index)?;
        let payments = read_payment_rows(s)?;
        let backdated = payments
            .iter()
            .any(|p| p.payment.loan_index == loan_index && p.payment.date > date);

        let split = split_payment(loan, amount);
        let payment = Payment {
            loan_index,
            date,
            amount,
            principal_paid: split.principal_paid,
            interest_paid: split.interest_paid,
            remaining_balance_after: split.new_balance,
            payments_left: split.payments_left,
        };
        s.append_row(PAYMENTS.name, payment.to_row())?;

        if mode == ReconcileMode::Replay && backdated {
            let baseline = interest_baseline(loan, loan_index, &payments);
            log::debug!(
                "Payment on {} predates later payments on loan {}; replaying",
                date,
                loan_index
            );
            replay_loan(s, loan_index, Some(baseline))?;
            let refreshed = read_payment_rows(s)?;
            return Ok(refreshed[payments.len()].payment.clone());
        }

        write_loan_totals(s, loan_index, split.new_total_interest, split.new_balance)?;
        log::debug!(
            "Loan {}: interest {} principal {} balance {}",
            loan_index,
            split.interest_paid,
            split.principal_paid,
            split.new_balance
        );
        Ok(payment)
    })
}

/// Rewrites a payment's loan, date and amount, then reconciles the
/// affected loans according to `mode`.
pub fn update_payment<S: TableStore>(
    store: &mut S,
    mode: ReconcileMode,
    index: usize,
    loan_index: usize,
    date: NaiveDate,
    amount: Decimal,
) -> TrackerResult<Payment> {
    log::info!(
        "Updating payment {} -> loan {}, {} on {} ({})",
        index,
        loan_index,
        amount,
        date,
        mode
    );
    let amount = round_money(amount);
    store.atomically(|s| {
        let payments = read_payment_rows(s)?;
        check_index("payment", index, payments.len())?;
        let loans = read_loans(s)?;
        let loan = loan_at(&loans, loan_index)?;

        match mode {
            ReconcileMode::InPlace => {
                let split = split_payment(loan, amount);
                let payment = Payment {
                    loan_index,
                    date,
                    amount,
                    principal_paid: split.principal_paid,
                    interest_paid: split.interest_paid,
                    remaining_balance_after: split.new_balance,
                    payments_left: split.payments_left,
                };
                s.update_row(PAYMENTS.name, index, payment.to_row())?;
                write_loan_balance(s, loan_index, split.new_balance)?;
                Ok(payment)
            }
            ReconcileMode::Replay => {
                let old_loan = payments[index].payment.loan_index;
                let mut targets =
                    vec![(loan_index, interest_baseline(loan, loan_index, &payments))];
                if old_loan != loan_index {
                    if let Some(prev) = loans.get(old_loan) {
                        targets.push((old_loan, interest_baseline(prev, old_loan, &payments)));
                    }
                }

                let mut edited = payments[index].payment.clone();
                edited.loan_index = loan_index;
                edited.date = date;
                edited.amount = amount;
                s.update_row(PAYMENTS.name, index, edited.to_row())?;

                for (target, baseline) in targets {
                    replay_loan(s, target, Some(baseline))?;
                }
                let refreshed = read_payment_rows(s)?;
                Ok(refreshed[index].payment.clone())
            }
        }
    })
}

/// Deletes a payment and gives its effect back to the loan according to
/// `mode`. Returns the removed payment as it was stored.
pub fn remove_payment<S: TableStore>(
    store: &mut S,
    mode: ReconcileMode,
    index: usize,
) -> TrackerResult<Payment> {
    log::info!("Removing payment at index {} ({})", index, mode);
    store.atomically(|s| {
        let payments = read_payment_rows(s)?;
        check_index("payment", index, payments.len())?;
        let removed = payments[index].payment.clone();
        let loans = read_loans(s)?;
        let Some(loan) = loans.get(removed.loan_index) else {
            log::warn!(
                "Payment {} references missing loan {}; removing without balance change",
                index,
                removed.loan_index
            );
            s.delete_row(PAYMENTS.name, index)?;
            return Ok(removed);
        };

        match mode {
            ReconcileMode::InPlace => {
                s.delete_row(PAYMENTS.name, index)?;
                let restored = loan.remaining_balance + removed.principal_paid;
                write_loan_balance(s, removed.loan_index, restored)?;
            }
            ReconcileMode::Replay => {
                let baseline = interest_baseline(loan, removed.loan_index, &payments);
                s.delete_row(PAYMENTS.name, index)?;
                replay_loan(s, removed.loan_index, Some(baseline))?;
            }
        }
        Ok(removed)
    })
}

/// The part of a loan's total interest that did not come from recorded
/// payments, i.e. the estimate made when the loan was created or re-termed.
pub fn interest_baseline(loan: &Loan, loan_index: usize, payments: &[PaymentRow]) -> Decimal {
    let paid: Decimal = payments
        .iter()
        .filter(|p| p.payment.loan_index == loan_index)
        .map(|p| p.payment.interest_paid)
        .sum();
    loan.total_interest - paid
}

/// Recomputes a loan from its original amount by walking `history`
/// (the payments referencing it) in date order. Returns the reconciled loan
/// and the rewritten payments, by position.
pub fn replay_history(
    loan: &Loan,
    baseline: Decimal,
    history: &[PaymentRow],
) -> (Loan, Vec<PaymentRow>) {
    let mut state = loan.clone();
    state.remaining_balance = loan.total_amount;
    state.total_interest = baseline;

    let mut ordered: Vec<&PaymentRow> = history.iter().collect();
    ordered.sort_by_key(|p| (p.payment.date, p.position));

    let mut rewritten = Vec::with_capacity(ordered.len());
    for row in ordered {
        let split = split_payment(&state, row.payment.amount);
        let mut payment = row.payment.clone();
        payment.principal_paid = split.principal_paid;
        payment.interest_paid = split.interest_paid;
        payment.remaining_balance_after = split.new_balance;
        payment.payments_left = split.payments_left;
        rewritten.push(PaymentRow {
            position: row.position,
            payment,
        });
        state.remaining_balance = split.new_balance;
        state.total_interest = split.new_total_interest;
    }
    (state, rewritten)
}

/// Replays a loan's payment history and writes the results back to both
/// tables. `baseline` defaults to the loan's current interest baseline.
pub fn replay_loan<S: TableStore>(
    store: &mut S,
    loan_index: usize,
    baseline: Option<Decimal>,
) -> TrackerResult<Loan> {
    let loans = read_loans(store)?;
    let loan = loan_at(&loans, loan_index)?;
    let payments = read_payment_rows(store)?;
    let baseline = baseline.unwrap_or_else(|| interest_baseline(loan, loan_index, &payments));
    let history: Vec<PaymentRow> = payments
        .into_iter()
        .filter(|p| p.payment.loan_index == loan_index)
        .collect();

    let (reconciled, rewritten) = replay_history(loan, baseline, &history);
    for row in &rewritten {
        store.update_row(PAYMENTS.name, row.position, row.payment.to_row())?;
    }
    write_loan_totals(
        store,
        loan_index,
        reconciled.total_interest,
        reconciled.remaining_balance,
    )?;
    log::debug!(
        "Replayed {} payments for loan {}: balance {}",
        rewritten.len(),
        loan_index,
        reconciled.remaining_balance
    );
    Ok(reconciled)
}

