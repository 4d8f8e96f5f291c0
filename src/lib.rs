//! finledger: personal income and expense ledger backed by a CSV file.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The [`console`] menu and the
//! [`cli`] commands drive the same [`domain::ledger::Ledger`] handle.

pub mod adapters;
pub mod cli;
pub mod console;
pub mod domain;
pub mod ports;
