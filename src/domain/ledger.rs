//! The ledger store handle.
//!
//! Every operation is a one-shot read-modify-write through a [`LedgerPort`]:
//! load the whole table, change the in-memory copy, save the whole table.
//! Mutations made through clones of one `Ledger` are serialized; separate
//! processes sharing a file are last-writer-wins.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::error::LedgerError;
use crate::domain::report::{self, MonthTotals, Totals, YearMonth};
use crate::domain::transaction::{
    Field, Kind, NewTransaction, Transaction, check_amount, parse_amount, today,
};
use crate::ports::ledger_port::LedgerPort;

#[derive(Clone)]
pub struct Ledger {
    port: Arc<dyn LedgerPort + Send + Sync>,
    write_lock: Arc<Mutex<()>>,
}

impl Ledger {
    pub fn new(port: Arc<dyn LedgerPort + Send + Sync>) -> Self {
        Self {
            port,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Read every row. Holds the write lock because the first load of a
    /// missing or legacy file rewrites it.
    pub fn load(&self) -> Result<Vec<Transaction>, LedgerError> {
        let _guard = self.lock();
        self.port.load()
    }

    /// Add `entry` at the end with the next free id.
    pub fn append(&self, entry: NewTransaction) -> Result<Transaction, LedgerError> {
        check_amount(entry.amount)?;
        let _guard = self.lock();
        let mut rows = self.port.load()?;
        let id = next_id(&rows);
        let transaction = Transaction::from_new(id, entry);
        rows.push(transaction.clone());
        self.port.save(&rows)?;
        info!(
            id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "transaction added"
        );
        Ok(transaction)
    }

    /// Parse user input and append it. A blank `date` means today. A
    /// malformed amount leaves the store untouched.
    pub fn add(
        &self,
        kind: Kind,
        category: &str,
        amount: &str,
        date: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let amount = parse_amount(amount)?;
        let date = match date.map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => today(),
        };
        self.append(NewTransaction {
            date,
            kind,
            category: category.trim().to_string(),
            amount,
        })
    }

    pub fn update(
        &self,
        position: usize,
        field: &str,
        value: &str,
    ) -> Result<Transaction, LedgerError> {
        self.modify(|rows| position_in(rows, position), field, value)
    }

    pub fn update_by_id(&self, id: u64, field: &str, value: &str) -> Result<Transaction, LedgerError> {
        self.modify(|rows| position_of(rows, id), field, value)
    }

    fn modify<F>(&self, locate: F, field: &str, value: &str) -> Result<Transaction, LedgerError>
    where
        F: FnOnce(&[Transaction]) -> Result<usize, LedgerError>,
    {
        let _guard = self.lock();
        let mut rows = self.port.load()?;
        let index = locate(&rows)?;
        let field: Field = field.parse()?;
        rows[index].set_field(field, value)?;
        self.port.save(&rows)?;
        info!(
            position = index,
            id = rows[index].id,
            field = field.column(),
            "transaction updated"
        );
        Ok(rows[index].clone())
    }

    /// Delete the row at `position`; later rows move down by one.
    pub fn remove(&self, position: usize) -> Result<Transaction, LedgerError> {
        self.delete(|rows| position_in(rows, position))
    }

    pub fn remove_by_id(&self, id: u64) -> Result<Transaction, LedgerError> {
        self.delete(|rows| position_of(rows, id))
    }

    fn delete<F>(&self, locate: F) -> Result<Transaction, LedgerError>
    where
        F: FnOnce(&[Transaction]) -> Result<usize, LedgerError>,
    {
        let _guard = self.lock();
        let mut rows = self.port.load()?;
        let index = locate(&rows)?;
        let removed = rows.remove(index);
        self.port.save(&rows)?;
        info!(position = index, id = removed.id, "transaction removed");
        Ok(removed)
    }

    pub fn totals(&self) -> Result<Totals, LedgerError> {
        Ok(report::totals(&self.load()?))
    }

    pub fn by_category(&self, kind: Kind) -> Result<BTreeMap<String, Decimal>, LedgerError> {
        Ok(report::by_category(&self.load()?, kind))
    }

    pub fn by_month(&self, kind: Kind) -> Result<BTreeMap<YearMonth, Decimal>, LedgerError> {
        report::by_month(&self.load()?, kind)
    }

    pub fn monthly_pivot(&self) -> Result<BTreeMap<YearMonth, MonthTotals>, LedgerError> {
        report::monthly_pivot(&self.load()?)
    }
}

fn next_id(rows: &[Transaction]) -> u64 {
    rows.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

fn position_in(rows: &[Transaction], position: usize) -> Result<usize, LedgerError> {
    if position < rows.len() {
        Ok(position)
    } else {
        Err(LedgerError::PositionOutOfRange {
            position,
            len: rows.len(),
        })
    }
}

fn position_of(rows: &[Transaction], id: u64) -> Result<usize, LedgerError> {
    rows.iter()
        .position(|t| t.id == id)
        .ok_or(LedgerError::TransactionNotFound { id })
}
