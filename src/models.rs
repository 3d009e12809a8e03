// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::utils::{fmt_amount, parse_date, parse_decimal};

pub type Row = Vec<String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
}

/// An expense as read back from the store, with the row position that
/// identifies it for removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub position: usize,
    #[serde(flatten)]
    pub expense: Expense,
}

/// Loan term. A fixed term always has at least one month; build one with
/// [`Term::months`] to fold zero into `Indefinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Fixed(u32),
    Indefinite,
}

impl Term {
    pub fn months(n: u32) -> Self {
        if n == 0 { Term::Indefinite } else { Term::Fixed(n) }
    }

    /// `Fixed(0)` built directly through the variant becomes `Indefinite`.
    pub fn normalized(self) -> Self {
        match self {
            Term::Fixed(n) => Term::months(n),
            Term::Indefinite => Term::Indefinite,
        }
    }
}

/// Wire shape shared by `Term` and `PaymentsLeft`: a count, or a text label.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CountOrLabel {
    Count(u32),
    Label(String),
}

impl Serialize for Term {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Term::Fixed(n) => CountOrLabel::Count(*n),
            Term::Indefinite => CountOrLabel::Label(self.to_string()),
        }
        .serialize(s)
    }
}

impl<'de> Deserialize<'de> for Term {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match CountOrLabel::deserialize(d)? {
            CountOrLabel::Count(n) => Ok(Term::months(n)),
            CountOrLabel::Label(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Fixed(n) => write!(f, "{}", n),
            Term::Indefinite => f.write_str("Indefinite"),
        }
    }
}

impl FromStr for Term {
    type Err = TrackerError;

    /// Positive whole numbers are fixed terms. Zero, negative numbers, an
    /// empty cell and the word "indefinite" all mean no fixed term.
    fn from_str(s: &str) -> TrackerResult<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("indefinite") {
            return Ok(Term::Indefinite);
        }
        let n = s
            .parse::<Decimal>()
            .map_err(|_| TrackerError::invalid_input(format!("Invalid term '{}'", s)))?;
        if n <= Decimal::ZERO {
            return Ok(Term::Indefinite);
        }
        if !n.fract().is_zero() {
            return Err(TrackerError::invalid_input(format!(
                "Term '{}' is not a whole number of months",
                s
            )));
        }
        let months = n
            .to_u32()
            .ok_or_else(|| TrackerError::invalid_input(format!("Term '{}' is too large", s)))?;
        Ok(Term::months(months))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub total_amount: Decimal,
    pub apr: Decimal,
    pub term: Term,
    pub category: String,
    pub monthly_payment: Decimal,
    pub total_interest: Decimal,
    pub remaining_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentsLeft {
    Count(u32),
    Unknown,
}

impl Serialize for PaymentsLeft {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            PaymentsLeft::Count(n) => CountOrLabel::Count(*n),
            PaymentsLeft::Unknown => CountOrLabel::Label(self.to_string()),
        }
        .serialize(s)
    }
}

impl<'de> Deserialize<'de> for PaymentsLeft {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match CountOrLabel::deserialize(d)? {
            CountOrLabel::Count(n) => Ok(PaymentsLeft::Count(n)),
            CountOrLabel::Label(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl fmt::Display for PaymentsLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentsLeft::Count(n) => write!(f, "{}", n),
            PaymentsLeft::Unknown => f.write_str("N/A"),
        }
    }
}

impl FromStr for PaymentsLeft {
    type Err = TrackerError;

    fn from_str(s: &str) -> TrackerResult<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("n/a") {
            return Ok(PaymentsLeft::Unknown);
        }
        s.parse::<u32>().map(PaymentsLeft::Count).map_err(|_| {
            TrackerError::invalid_input(format!("Invalid payments left '{}'", s))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub loan_index: usize,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub principal_paid: Decimal,
    pub interest_paid: Decimal,
    pub remaining_balance_after: Decimal,
    pub payments_left: PaymentsLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub position: usize,
    #[serde(flatten)]
    pub payment: Payment,
}

fn cell<'a>(row: &'a [String], idx: usize, table: &str) -> TrackerResult<&'a str> {
    row.get(idx).map(|s| s.as_str()).ok_or_else(|| {
        TrackerError::invalid_input(format!(
            "{} row is missing column {} (have {})",
            table,
            idx + 1,
            row.len()
        ))
    })
}

impl Expense {
    pub fn to_row(&self) -> Row {
        vec![
            self.date.to_string(),
            fmt_amount(&self.amount),
            self.description.clone(),
            self.category.clone(),
        ]
    }

    pub fn from_row(row: &[String]) -> TrackerResult<Self> {
        Ok(Expense {
            date: parse_date(cell(row, 0, "Expenses")?)?,
            amount: parse_decimal(cell(row, 1, "Expenses")?)?,
            description: cell(row, 2, "Expenses")?.to_string(),
            category: cell(row, 3, "Expenses")?.to_string(),
        })
    }
}

impl Loan {
    pub fn to_row(&self) -> Row {
        vec![
            fmt_amount(&self.total_amount),
            self.apr.to_string(),
            self.term.to_string(),
            self.category.clone(),
            fmt_amount(&self.monthly_payment),
            fmt_amount(&self.total_interest),
            fmt_amount(&self.remaining_balance),
        ]
    }

    pub fn from_row(row: &[String]) -> TrackerResult<Self> {
        Ok(Loan {
            total_amount: parse_decimal(cell(row, 0, "Loans")?)?,
            apr: parse_decimal(cell(row, 1, "Loans")?)?,
            term: cell(row, 2, "Loans")?.parse()?,
            category: cell(row, 3, "Loans")?.to_string(),
            monthly_payment: parse_decimal(cell(row, 4, "Loans")?)?,
            total_interest: parse_decimal(cell(row, 5, "Loans")?)?,
            remaining_balance: parse_decimal(cell(row, 6, "Loans")?)?,
        })
    }

    pub fn monthly_rate(&self) -> Decimal {
        crate::amortization::monthly_rate(self.apr)
    }
}

impl Payment {
    pub fn to_row(&self) -> Row {
        vec![
            self.loan_index.to_string(),
            self.date.to_string(),
            fmt_amount(&self.amount),
            fmt_amount(&self.principal_paid),
            fmt_amount(&self.interest_paid),
            fmt_amount(&self.remaining_balance_after),
            self.payments_left.to_string(),
        ]
    }

    pub fn from_row(row: &[String]) -> TrackerResult<Self> {
        let loan_index = cell(row, 0, "Payments")?;
        Ok(Payment {
            loan_index: loan_index.trim().parse().map_err(|_| {
                TrackerError::invalid_input(format!("Invalid loan index '{}'", loan_index))
            })?,
            date: parse_date(cell(row, 1, "Payments")?)?,
            amount: parse_decimal(cell(row, 2, "Payments")?)?,
            principal_paid: parse_decimal(cell(row, 3, "Payments")?)?,
            interest_paid: parse_decimal(cell(row, 4, "Payments")?)?,
            remaining_balance_after: parse_decimal(cell(row, 5, "Payments")?)?,
            payments_left: row
                .get(6)
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(PaymentsLeft::Unknown),
        })
    }
}
