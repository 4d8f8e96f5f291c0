#![allow(dead_code)]

use finledger::domain::error::LedgerError;
use finledger::domain::ledger::Ledger;
use finledger::domain::transaction::{Kind, Transaction};
use finledger::ports::ledger_port::LedgerPort;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

/// Ledger port backed by a vector, with an optional failure on save.
#[derive(Default)]
pub struct InMemoryLedger {
    pub rows: Mutex<Vec<Transaction>>,
    pub fail_saves: bool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Transaction>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail_saves: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_saves: true,
        }
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.rows.lock().unwrap().clone()
    }
}

impl LedgerPort for InMemoryLedger {
    fn load(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.snapshot())
    }

    fn save(&self, rows: &[Transaction]) -> Result<(), LedgerError> {
        if self.fail_saves {
            return Err(LedgerError::Storage {
                reason: "disk full".into(),
            });
        }
        *self.rows.lock().unwrap() = rows.to_vec();
        Ok(())
    }
}

/// A ledger handle plus the port behind it, for inspecting stored rows.
pub fn ledger_with(rows: Vec<Transaction>) -> (Ledger, Arc<InMemoryLedger>) {
    let port = Arc::new(InMemoryLedger::with_rows(rows));
    (Ledger::new(port.clone()), port)
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn make_row(id: u64, date: &str, kind: Kind, category: &str, amount: &str) -> Transaction {
    Transaction {
        id,
        date: date.to_string(),
        kind,
        category: category.to_string(),
        amount: dec(amount),
    }
}

/// Income 1000 and two expenses across January and February 2024.
pub fn sample_rows() -> Vec<Transaction> {
    vec![
        make_row(1, "2024-01-10", Kind::Income, "Salary", "1000.00"),
        make_row(2, "2024-01-15", Kind::Expense, "Food", "50.00"),
        make_row(3, "2024-02-03", Kind::Expense, "Transport", "20.00"),
    ]
}
