//! Ledger entry representation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::error::LedgerError;

/// Date formats accepted by the month reports, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Largest magnitude a single amount may have. Report sums over any
/// realistic number of rows stay far inside `Decimal`'s range.
// 1_000_000_000_000_000 (10^15) == 0x0003_8D7E_A4C6_8000
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Income, Kind::Expense];

    pub fn label(&self) -> &'static str {
        match self {
            Kind::Income => "Income",
            Kind::Expense => "Expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    /// Accepts the English labels and the `Receita`/`Despesa` labels found in
    /// older ledger files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(Kind::Income),
            "expense" | "despesa" => Ok(Kind::Expense),
            _ => Err(LedgerError::InvalidKind {
                input: s.to_string(),
            }),
        }
    }
}

/// An editable column of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Kind,
    Category,
    Value,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Kind => "type",
            Field::Category => "category",
            Field::Value => "value",
        }
    }
}

impl FromStr for Field {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" | "data" => Ok(Field::Date),
            "type" | "kind" | "tipo" => Ok(Field::Kind),
            "category" | "categoria" => Ok(Field::Category),
            "value" | "amount" | "valor" => Ok(Field::Value),
            _ => Err(LedgerError::UnknownField {
                field: s.to_string(),
            }),
        }
    }
}

/// A transaction before it has been assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: String,
    pub kind: Kind,
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: u64,
    /// Date-like text, normally `YYYY-MM-DD`. Only parsed by month reports.
    pub date: String,
    pub kind: Kind,
    pub category: String,
    pub amount: Decimal,
}

impl Transaction {
    pub fn from_new(id: u64, entry: NewTransaction) -> Self {
        Self {
            id,
            date: entry.date,
            kind: entry.kind,
            category: entry.category,
            amount: entry.amount,
        }
    }

    /// Signed contribution to the balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            Kind::Income => self.amount,
            Kind::Expense => -self.amount,
        }
    }

    /// Overwrite one cell. Type and value are validated; date and category
    /// are stored verbatim.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), LedgerError> {
        match field {
            Field::Date => self.date = value.trim().to_string(),
            Field::Kind => self.kind = value.parse()?,
            Field::Category => self.category = value.trim().to_string(),
            Field::Value => self.amount = parse_amount(value)?,
        }
        Ok(())
    }
}

pub fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::InvalidAmount {
            input: input.to_string(),
        })?;
    check_amount(amount).map_err(|_| LedgerError::AmountTooLarge {
        input: input.to_string(),
    })
}

/// Reject amounts whose magnitude exceeds [`MAX_AMOUNT`].
pub fn check_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount.abs() > MAX_AMOUNT {
        return Err(LedgerError::AmountTooLarge {
            input: amount.to_string(),
        });
    }
    Ok(amount)
}

/// Parse the calendar date of a ledger row. A trailing time component
/// (`2024-01-05 10:30:00`, `2024-01-05T10:30:00`) is ignored.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Today's date in the ledger's storage format.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
