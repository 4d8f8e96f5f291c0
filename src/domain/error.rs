//! Domain error types.

/// Top-level error type for finledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount '{input}': expected a number")]
    InvalidAmount { input: String },

    #[error("amount '{input}' exceeds the largest supported value")]
    AmountTooLarge { input: String },

    #[error("invalid type '{input}': expected Income or Expense")]
    InvalidKind { input: String },

    #[error("invalid date '{input}' at position {position}")]
    InvalidDate { input: String, position: usize },

    #[error("position {position} out of range (ledger has {len} entries)")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("no transaction with id {id}")]
    TransactionNotFound { id: u64 },

    #[error("unknown field '{field}': expected one of date, type, category, value")]
    UnknownField { field: String },

    #[error("schema error in {file}: {reason}")]
    Schema { file: String, reason: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// True for malformed user input (amount, type, date).
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmount { .. }
                | LedgerError::AmountTooLarge { .. }
                | LedgerError::InvalidKind { .. }
                | LedgerError::InvalidDate { .. }
        )
    }

    /// True when the addressed row or column does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::PositionOutOfRange { .. }
                | LedgerError::TransactionNotFound { .. }
                | LedgerError::UnknownField { .. }
        )
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Storage {
            reason: format!("CSV error: {}", err),
        }
    }
}

impl From<&LedgerError> for std::process::ExitCode {
    fn from(err: &LedgerError) -> Self {
        let code: u8 = match err {
            LedgerError::Io(_) => 1,
            LedgerError::ConfigParse { .. } | LedgerError::ConfigInvalid { .. } => 2,
            LedgerError::Schema { .. } | LedgerError::Storage { .. } => 3,
            LedgerError::InvalidAmount { .. }
            | LedgerError::AmountTooLarge { .. }
            | LedgerError::InvalidKind { .. }
            | LedgerError::InvalidDate { .. } => 4,
            LedgerError::PositionOutOfRange { .. }
            | LedgerError::TransactionNotFound { .. }
            | LedgerError::UnknownField { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
