// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Public operations. Each one catches its own failure, logs it, and returns
//! the freshest state it can read together with an `error` message, so
//! callers check `error` instead of handling a `Result`.

use std::path::Path;

use serde::Serialize;

use crate::bootstrap;
use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::expenses::{self, ExpenseSummary};
use crate::loans::{self, LoanTerms};
use crate::models::{Expense, Loan, PaymentRow};
use crate::payments;
use crate::store::{CATEGORIES, EXPENSES, LOANS, PAYMENTS, TableStore};
use crate::utils::{parse_date, parse_decimal, parse_optional_decimal};

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub summary: ExpenseSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub loans: Vec<Loan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub loans: Vec<Loan>,
    pub payments: Vec<PaymentRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub imported: usize,
    pub loans: Vec<Loan>,
}

/// Loan inputs as they arrive from a form or command line.
#[derive(Debug, Clone, Copy)]
pub struct LoanInput<'a> {
    pub total_amount: &'a str,
    pub apr: &'a str,
    pub term: &'a str,
    pub category: &'a str,
    pub monthly_payment: Option<&'a str>,
}

impl LoanInput<'_> {
    fn parse(&self) -> TrackerResult<LoanTerms> {
        Ok(LoanTerms {
            total_amount: parse_decimal(self.total_amount)?,
            apr: parse_decimal(self.apr)?,
            term: self.term.parse()?,
            category: self.category.trim().to_string(),
            monthly_payment: parse_optional_decimal(self.monthly_payment)?,
        })
    }
}

fn parse_expense(
    date: &str,
    amount: &str,
    description: &str,
    category: &str,
) -> TrackerResult<Expense> {
    Ok(Expense {
        date: parse_date(date)?,
        amount: parse_decimal(amount)?,
        description: description.to_string(),
        category: category.trim().to_string(),
    })
}

fn failure(op: &str, res: TrackerResult<()>) -> Option<String> {
    match res {
        Ok(()) => None,
        Err(e) => {
            log::error!("Error in {}: {}", op, e);
            Some(e.to_string())
        }
    }
}

fn merge(first: Option<String>, second: &TrackerError) -> Option<String> {
    Some(match first {
        Some(f) => format!("{}; {}", f, second),
        None => second.to_string(),
    })
}

pub struct Tracker<S: TableStore> {
    store: S,
    config: TrackerConfig,
}

impl<S: TableStore> Tracker<S> {
    /// Wraps `store`, creating any of the four tables that are missing.
    pub fn new(mut store: S, config: TrackerConfig) -> TrackerResult<Self> {
        for schema in [&EXPENSES, &CATEGORIES, &LOANS, &PAYMENTS] {
            store.ensure_table(schema)?;
        }
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn expense_report(&self, error: Option<String>, search: Option<&str>) -> ExpenseReport {
        match expenses::expense_summary(&self.store, search) {
            Ok(summary) => ExpenseReport { error, summary },
            Err(e) => {
                log::error!("Error reading expenses: {}", e);
                ExpenseReport {
                    error: merge(error, &e),
                    summary: ExpenseSummary::default(),
                }
            }
        }
    }

    fn category_report(&self, error: Option<String>) -> CategoryReport {
        match expenses::read_categories(&self.store) {
            Ok(categories) => CategoryReport { error, categories },
            Err(e) => CategoryReport {
                error: merge(error, &e),
                categories: Vec::new(),
            },
        }
    }

    fn loan_report(&self, error: Option<String>) -> LoanReport {
        match loans::read_loans(&self.store) {
            Ok(loans) => LoanReport { error, loans },
            Err(e) => LoanReport {
                error: merge(error, &e),
                loans: Vec::new(),
            },
        }
    }

    fn ledger_report(&self, error: Option<String>) -> LedgerReport {
        let state = loans::read_loans(&self.store)
            .and_then(|l| payments::read_payments(&self.store).map(|p| (l, p)));
        match state {
            Ok((loans, payments)) => {
                log::debug!("Fetched {} loans, {} payments", loans.len(), payments.len());
                LedgerReport {
                    error,
                    loans,
                    payments,
                }
            }
            Err(e) => {
                log::error!("Error reading loans and payments: {}", e);
                LedgerReport {
                    error: merge(error, &e),
                    loans: Vec::new(),
                    payments: Vec::new(),
                }
            }
        }
    }

    pub fn add_expense(
        &mut self,
        date: &str,
        amount: &str,
        description: &str,
        category: &str,
    ) -> ExpenseReport {
        let res = parse_expense(date, amount, description, category)
            .and_then(|expense| expenses::add_expense(&mut self.store, &expense));
        let error = failure("add_expense", res);
        self.expense_report(error, None)
    }

    pub fn update_expense(
        &mut self,
        index: usize,
        date: &str,
        amount: &str,
        description: &str,
        category: &str,
    ) -> ExpenseReport {
        let res = parse_expense(date, amount, description, category)
            .and_then(|expense| expenses::update_expense(&mut self.store, index, &expense));
        let error = failure("update_expense", res);
        self.expense_report(error, None)
    }

    pub fn get_expenses(&self, search: Option<&str>) -> ExpenseReport {
        self.expense_report(None, search)
    }

    pub fn remove_expense(&mut self, index: usize) -> ExpenseReport {
        let error = failure(
            "remove_expense",
            expenses::remove_expense(&mut self.store, index),
        );
        self.expense_report(error, None)
    }

    pub fn get_categories(&self) -> CategoryReport {
        self.category_report(None)
    }

    pub fn add_category(&mut self, name: &str) -> CategoryReport {
        let name = name.trim();
        let res = if name.is_empty() {
            Err(TrackerError::invalid_input("Category name is empty"))
        } else {
            expenses::add_category(&mut self.store, name)
        };
        let error = failure("add_category", res);
        self.category_report(error)
    }

    pub fn get_loans(&self) -> LoanReport {
        self.loan_report(None)
    }

    pub fn add_loan(&mut self, input: LoanInput<'_>) -> LoanReport {
        let res = input
            .parse()
            .and_then(|terms| loans::add_loan(&mut self.store, &self.config, &terms))
            .map(|_| ());
        let error = failure("add_loan", res);
        self.loan_report(error)
    }

    pub fn update_loan(&mut self, index: usize, input: LoanInput<'_>) -> LoanReport {
        let res = input
            .parse()
            .and_then(|terms| loans::update_loan(&mut self.store, &self.config, index, &terms))
            .map(|_| ());
        let error = failure("update_loan", res);
        self.loan_report(error)
    }

    pub fn remove_loan(&mut self, index: usize) -> LoanReport {
        let error = failure(
            "remove_loan",
            loans::remove_loan(&mut self.store, index).map(|_| ()),
        );
        self.loan_report(error)
    }

    pub fn add_payment(&mut self, loan_index: usize, date: &str, amount: &str) -> LedgerReport {
        let mode = self.config.reconcile;
        let res = (|| {
            let date = parse_date(date)?;
            let amount = parse_decimal(amount)?;
            payments::apply_payment(&mut self.store, mode, loan_index, date, amount).map(|_| ())
        })();
        let error = failure("add_payment", res);
        self.ledger_report(error)
    }

    pub fn update_payment(
        &mut self,
        index: usize,
        loan_index: usize,
        date: &str,
        amount: &str,
    ) -> LedgerReport {
        let mode = self.config.reconcile;
        let res = (|| {
            let date = parse_date(date)?;
            let amount = parse_decimal(amount)?;
            payments::update_payment(&mut self.store, mode, index, loan_index, date, amount)
                .map(|_| ())
        })();
        let error = failure("update_payment", res);
        self.ledger_report(error)
    }

    pub fn remove_payment(&mut self, index: usize) -> LedgerReport {
        let error = failure(
            "remove_payment",
            payments::remove_payment(&mut self.store, self.config.reconcile, index).map(|_| ()),
        );
        self.ledger_report(error)
    }

    pub fn get_initial_data(&self) -> LedgerReport {
        self.ledger_report(None)
    }

    fn import_report(&self, res: TrackerResult<usize>, op: &str) -> ImportReport {
        let (imported, error) = match res {
            Ok(n) => (n, None),
            Err(e) => {
                log::error!("Error in {}: {}", op, e);
                (0, Some(e.to_string()))
            }
        };
        let loans = self.loan_report(error);
        ImportReport {
            error: loans.error,
            imported,
            loans: loans.loans,
        }
    }

    pub fn import_legacy_table(&mut self) -> ImportReport {
        let res = bootstrap::import_legacy_table(&mut self.store, &self.config);
        self.import_report(res, "import_legacy_table")
    }

    pub fn import_legacy_csv(&mut self, path: &Path) -> ImportReport {
        let res = bootstrap::import_legacy_csv(&mut self.store, &self.config, path)
            .map_err(|e| TrackerError::invalid_input(format!("{:#}", e)));
        self.import_report(res, "import_legacy_csv")
    }
}
