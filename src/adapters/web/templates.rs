//! HTML templates using Askama.

use askama::Template;

use crate::domain::report::{self, Totals, format_amount};
use crate::domain::transaction::{Kind, Transaction};

/// One table row of the ledger list.
pub struct EntryRow {
    pub id: u64,
    pub position: usize,
    pub date: String,
    pub kind: &'static str,
    pub category: String,
    pub amount: String,
    pub balance: String,
    pub css_class: &'static str,
}

/// Everything the ledger list shows, shared by the full page and the
/// HTMX fragment.
pub struct LedgerView {
    pub income: String,
    pub expense: String,
    pub balance: String,
    pub balance_negative: bool,
    pub chart_svg: String,
    pub has_chart: bool,
    pub entries: Vec<EntryRow>,
}

impl LedgerView {
    pub fn build(
        rows: &[Transaction],
        chart_svg: Option<String>,
        currency: &str,
        newest_first: bool,
    ) -> Self {
        let Totals {
            income,
            expense,
            balance,
        } = report::totals(rows);

        let mut entries: Vec<EntryRow> = rows
            .iter()
            .zip(report::running_balance(rows))
            .enumerate()
            .map(|(position, (t, running))| EntryRow {
                id: t.id,
                position,
                date: t.date.clone(),
                kind: t.kind.label(),
                category: t.category.clone(),
                amount: format_amount(currency, t.amount),
                balance: format_amount(currency, running),
                css_class: match t.kind {
                    Kind::Income => "income",
                    Kind::Expense => "expense",
                },
            })
            .collect();
        if newest_first {
            entries.reverse();
        }

        Self {
            income: format_amount(currency, income),
            expense: format_amount(currency, expense),
            balance: format_amount(currency, balance),
            balance_negative: balance < rust_decimal::Decimal::ZERO,
            has_chart: chart_svg.is_some(),
            chart_svg: chart_svg.unwrap_or_default(),
            entries,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub view: &'a LedgerView,
}

#[derive(Template)]
#[template(path = "ledger.html")]
pub struct LedgerFragment<'a> {
    pub view: &'a LedgerView,
}

#[derive(Template)]
#[template(path = "add.html")]
pub struct AddTemplate<'a> {
    pub today: &'a str,
    pub kinds: &'a [Kind],
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
