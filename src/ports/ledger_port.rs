//! Ledger storage port trait.

use crate::domain::error::LedgerError;
use crate::domain::transaction::Transaction;

/// Whole-table storage. Every mutation is a full `load` then `save`.
pub trait LedgerPort {
    /// Read every row in insertion order, initializing the store if needed.
    fn load(&self) -> Result<Vec<Transaction>, LedgerError>;

    /// Replace the stored table with `rows`.
    fn save(&self, rows: &[Transaction]) -> Result<(), LedgerError>;
}
