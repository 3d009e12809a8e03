// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Loan arithmetic: level monthly payment, total interest, and the
//! interest/principal split of a single payment.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::config::IndefiniteInterest;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Loan, PaymentsLeft, Term};
use crate::utils::round_money;

/// Horizon used to estimate interest on loans with no fixed term.
pub const INDEFINITE_HORIZON_MONTHS: u32 = 360;

pub fn monthly_rate(apr: Decimal) -> Decimal {
    apr / Decimal::from(12) / Decimal::ONE_HUNDRED
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Amortization {
    pub term: Term,
    pub monthly_payment: Decimal,
    pub total_interest: Decimal,
}

/// Level payment that retires `principal` over `months` at `rate` per month.
/// A zero rate degenerates to straight division.
pub fn annuity_payment(principal: Decimal, rate: Decimal, months: u32) -> TrackerResult<Decimal> {
    if months == 0 {
        return Err(TrackerError::invalid_input(
            "A fixed-term loan needs at least one month",
        ));
    }
    let n = Decimal::from(months);
    if rate.is_zero() {
        return Ok(principal / n);
    }
    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(months))
        .ok_or_else(|| {
            TrackerError::invalid_input(format!(
                "Rate {} over {} months overflows the payment formula",
                rate, months
            ))
        })?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Ok(principal / n);
    }
    principal
        .checked_mul(rate)
        .and_then(|num| num.checked_mul(factor))
        .and_then(|num| num.checked_div(denom))
        .ok_or_else(|| {
            TrackerError::invalid_input(format!(
                "Payment on {} at rate {} over {} months overflows",
                principal, rate, months
            ))
        })
}

/// Monthly payment and total interest for a new or re-termed loan.
///
/// A supplied payment is honored only when positive. Money is rounded to
/// cents, and total interest is derived from the rounded payment and never
/// negative.
pub fn compute_amortization(
    total_amount: Decimal,
    apr: Decimal,
    term: Term,
    supplied_payment: Option<Decimal>,
    indefinite: IndefiniteInterest,
) -> TrackerResult<Amortization> {
    let rate = monthly_rate(apr);
    let supplied = supplied_payment.filter(|p| *p > Decimal::ZERO);

    let term = term.normalized();
    let (monthly_payment, total_interest) = match term {
        Term::Fixed(months) => {
            let payment = match supplied {
                Some(p) => p,
                None => annuity_payment(total_amount, rate, months)?,
            };
            let payment = round_money(payment);
            (payment, payment * Decimal::from(months) - total_amount)
        }
        Term::Indefinite => {
            let payment = round_money(supplied.unwrap_or(total_amount * rate));
            let interest = match indefinite {
                IndefiniteInterest::Projected360 => {
                    payment * Decimal::from(INDEFINITE_HORIZON_MONTHS) - total_amount
                }
                IndefiniteInterest::Zero => Decimal::ZERO,
            };
            (payment, interest)
        }
    };

    Ok(Amortization {
        term,
        monthly_payment,
        total_interest: round_money(total_interest.max(Decimal::ZERO)),
    })
}

/// Projected number of payments to clear `balance`. Zero once the balance is
/// cleared; unknown when there is no monthly payment to divide by.
pub fn payments_left(balance: Decimal, monthly_payment: Decimal) -> PaymentsLeft {
    let Some(ratio) = balance.checked_div(monthly_payment) else {
        return PaymentsLeft::Unknown;
    };
    let n = ratio.ceil();
    if n <= Decimal::ZERO {
        return PaymentsLeft::Count(0);
    }
    n.to_u32()
        .map(PaymentsLeft::Count)
        .unwrap_or(PaymentsLeft::Unknown)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentSplit {
    pub interest_paid: Decimal,
    pub principal_paid: Decimal,
    pub new_balance: Decimal,
    pub new_total_interest: Decimal,
    pub payments_left: PaymentsLeft,
}

/// Splits `amount` into a month of interest on the loan's remaining balance
/// and principal. Principal goes negative when the payment does not cover
/// the interest, and the balance grows accordingly.
pub fn split_payment(loan: &Loan, amount: Decimal) -> PaymentSplit {
    let interest = loan.remaining_balance * loan.monthly_rate();
    let principal = amount - interest;
    let new_balance = loan.remaining_balance - principal;
    PaymentSplit {
        interest_paid: round_money(interest),
        principal_paid: round_money(principal),
        new_balance: round_money(new_balance),
        new_total_interest: round_money(loan.total_interest + interest),
        payments_left: payments_left(new_balance, loan.monthly_payment),
    }
}
