//! Core domain types and logic.

pub mod error;
pub mod ledger;
pub mod report;
pub mod settings;
pub mod transaction;
