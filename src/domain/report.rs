//! Aggregate queries over a ledger snapshot.
//!
//! All functions are pure: they take the rows loaded by
//! [`Ledger`](crate::domain::ledger::Ledger) and never touch storage.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::domain::error::LedgerError;
use crate::domain::transaction::{Kind, Transaction, parse_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Calendar month key, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthTotals {
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }

    fn add(&mut self, kind: Kind, amount: Decimal) {
        match kind {
            Kind::Income => self.income = self.income.saturating_add(amount),
            Kind::Expense => self.expense = self.expense.saturating_add(amount),
        }
    }
}

pub fn totals(rows: &[Transaction]) -> Totals {
    let (income, expense) = rows.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), t| match t.kind {
            Kind::Income => (income.saturating_add(t.amount), expense),
            Kind::Expense => (income, expense.saturating_add(t.amount)),
        },
    );
    Totals {
        income,
        expense,
        balance: income.saturating_sub(expense),
    }
}

pub fn by_category(rows: &[Transaction], kind: Kind) -> BTreeMap<String, Decimal> {
    let mut sums: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in rows.iter().filter(|t| t.kind == kind) {
        let sum = sums.entry(t.category.clone()).or_default();
        *sum = sum.saturating_add(t.amount);
    }
    sums
}

/// Resolve every row's month. Any unparseable date fails the whole query.
fn months(rows: &[Transaction]) -> Result<Vec<YearMonth>, LedgerError> {
    rows.iter()
        .enumerate()
        .map(|(position, t)| {
            parse_date(&t.date)
                .map(|d| YearMonth::new(d.year(), d.month()))
                .ok_or_else(|| LedgerError::InvalidDate {
                    input: t.date.clone(),
                    position,
                })
        })
        .collect()
}

pub fn by_month(
    rows: &[Transaction],
    kind: Kind,
) -> Result<BTreeMap<YearMonth, Decimal>, LedgerError> {
    let months = months(rows)?;
    let mut sums: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
    for (t, month) in rows.iter().zip(months) {
        if t.kind == kind {
            let sum = sums.entry(month).or_default();
            *sum = sum.saturating_add(t.amount);
        }
    }
    Ok(sums)
}

/// Income and expense per month. A month with only one kind reports zero
/// for the other.
pub fn monthly_pivot(
    rows: &[Transaction],
) -> Result<BTreeMap<YearMonth, MonthTotals>, LedgerError> {
    let months = months(rows)?;
    let mut pivot: BTreeMap<YearMonth, MonthTotals> = BTreeMap::new();
    for (t, month) in rows.iter().zip(months) {
        pivot.entry(month).or_default().add(t.kind, t.amount);
    }
    Ok(pivot)
}

/// Balance after each row, in row order.
pub fn running_balance(rows: &[Transaction]) -> Vec<Decimal> {
    rows.iter()
        .scan(Decimal::ZERO, |acc, t| {
            *acc = acc.saturating_add(t.signed_amount());
            Some(*acc)
        })
        .collect()
}

/// `"{currency} {amount}"` with two decimal places.
pub fn format_amount(currency: &str, amount: Decimal) -> String {
    format!("{} {:.2}", currency, amount.round_dp(2))
}
