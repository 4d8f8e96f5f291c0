//! Interactive menu-driven console over a [`Ledger`].
//!
//! Reads commands from any `BufRead` and writes to any `Write`, so the same
//! loop serves a terminal and scripted tests. Ledger errors are printed and
//! the menu continues; only I/O failures on the console itself end the loop.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::adapters::{chart_svg, chart_text};
use crate::domain::error::LedgerError;
use crate::domain::ledger::Ledger;
use crate::domain::report::{self, format_amount};
use crate::domain::settings::Settings;
use crate::domain::transaction::{Kind, Transaction};

const MENU: &str = "\n1. Add income\n2. Add expense\n3. List/Edit/Remove\n4. Reports and balance\n5. Display charts\n6. Exit";

pub struct Console<'a, R, W> {
    ledger: &'a Ledger,
    settings: &'a Settings,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(ledger: &'a Ledger, settings: &'a Settings, input: R, output: W) -> Self {
        Self {
            ledger,
            settings,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Choose: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => self.add(Kind::Income)?,
                "2" => self.add(Kind::Expense)?,
                "3" => self.manage()?,
                "4" => self.reports()?,
                "5" => self.charts()?,
                "6" => {
                    writeln!(self.output, "Goodbye.")?;
                    break;
                }
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
        Ok(())
    }

    /// Print `label` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report_error(&mut self, err: &LedgerError) -> io::Result<()> {
        writeln!(self.output, "error: {}", err)
    }

    fn add(&mut self, kind: Kind) -> io::Result<()> {
        let (amount_label, category_label) = match kind {
            Kind::Income => ("Income amount: ", "Source (e.g. Salary, Sale): "),
            Kind::Expense => ("Expense amount: ", "Category (e.g. Groceries, Power): "),
        };
        let Some(amount) = self.prompt(amount_label)? else {
            return Ok(());
        };
        let Some(category) = self.prompt(category_label)? else {
            return Ok(());
        };
        let Some(date) = self.prompt("Date (YYYY-MM-DD) or [Enter] for today: ")? else {
            return Ok(());
        };

        match self.ledger.add(kind, &category, &amount, Some(&date)) {
            Ok(t) => writeln!(self.output, "{} added (id {}).", kind, t.id),
            Err(e) => self.report_error(&e),
        }
    }

    fn manage(&mut self) -> io::Result<()> {
        let Some(choice) = self.prompt("[L]ist, [E]dit, [R]emove: ")? else {
            return Ok(());
        };
        match choice.to_uppercase().as_str() {
            "L" => self.list().map(|_| ()),
            "E" => self.edit(),
            "R" => self.remove(),
            _ => writeln!(self.output, "Invalid option."),
        }
    }

    /// Print every row with its position. Returns false when there is
    /// nothing to show.
    fn list(&mut self) -> io::Result<bool> {
        let rows = match self.ledger.load() {
            Ok(rows) => rows,
            Err(e) => {
                self.report_error(&e)?;
                return Ok(false);
            }
        };
        if rows.is_empty() {
            writeln!(self.output, "No transactions recorded.")?;
            return Ok(false);
        }
        write_rows(&mut self.output, &rows, &self.settings.currency)?;
        Ok(true)
    }

    fn read_position(&mut self, label: &str) -> io::Result<Option<usize>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.parse::<usize>() {
            Ok(position) => Ok(Some(position)),
            Err(_) => {
                writeln!(self.output, "error: '{}' is not a valid position", raw)?;
                Ok(None)
            }
        }
    }

    fn edit(&mut self) -> io::Result<()> {
        if !self.list()? {
            return Ok(());
        }
        let Some(position) = self.read_position("Position to edit: ")? else {
            return Ok(());
        };
        let Some(field) = self.prompt("Field (date, type, category, value): ")? else {
            return Ok(());
        };
        let Some(value) = self.prompt("New value: ")? else {
            return Ok(());
        };
        match self.ledger.update(position, &field, &value) {
            Ok(_) => writeln!(self.output, "Updated."),
            Err(e) => self.report_error(&e),
        }
    }

    fn remove(&mut self) -> io::Result<()> {
        if !self.list()? {
            return Ok(());
        }
        let Some(position) = self.read_position("Position to REMOVE: ")? else {
            return Ok(());
        };
        match self.ledger.remove(position) {
            Ok(t) => {
                let amount = format_amount(&self.settings.currency, t.amount);
                writeln!(self.output, "Removed {} {} ({}).", t.kind, amount, t.category)
            }
            Err(e) => self.report_error(&e),
        }
    }

    fn reports(&mut self) -> io::Result<()> {
        let rows = match self.ledger.load() {
            Ok(rows) => rows,
            Err(e) => return self.report_error(&e),
        };
        match write_report(&mut self.output, &rows, &self.settings.currency) {
            Ok(()) => Ok(()),
            Err(LedgerError::Io(e)) => Err(e),
            Err(e) => self.report_error(&e),
        }
    }

    fn charts(&mut self) -> io::Result<()> {
        let rows = match self.ledger.load() {
            Ok(rows) => rows,
            Err(e) => return self.report_error(&e),
        };
        if rows.is_empty() {
            return writeln!(self.output, "No data to chart.");
        }
        writeln!(self.output)?;
        let settings = self.settings;
        let output = &settings.chart.output;
        match write_charts(&mut self.output, &rows, settings, output) {
            Ok(()) => writeln!(self.output, "\nChart written to {}", output.display()),
            Err(e) => self.report_error(&e),
        }
    }
}

/// Write `rows` as a table with their positions.
pub fn write_rows(out: &mut impl Write, rows: &[Transaction], currency: &str) -> io::Result<()> {
    let category_width = rows
        .iter()
        .map(|t| t.category.chars().count())
        .max()
        .unwrap_or(0)
        .max("category".len());
    writeln!(
        out,
        "{:>3}  {:<10}  {:<7}  {:<width$}  {:>12}",
        "#",
        "date",
        "type",
        "category",
        "value",
        width = category_width
    )?;
    for (position, t) in rows.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<10}  {:<7}  {:<width$}  {:>12}",
            position,
            t.date,
            t.kind.label(),
            t.category,
            format_amount(currency, t.amount),
            width = category_width
        )?;
    }
    Ok(())
}

/// Write the balance, expenses by category, expenses by month and the
/// monthly income/expense comparison.
///
/// Dates are checked before anything is written, so an unparsable date
/// produces no partial report.
pub fn write_report(
    out: &mut impl Write,
    rows: &[Transaction],
    currency: &str,
) -> Result<(), LedgerError> {
    if rows.is_empty() {
        writeln!(out, "No data to report.")?;
        return Ok(());
    }
    let by_month = report::by_month(rows, Kind::Expense)?;
    let pivot = report::monthly_pivot(rows)?;
    let by_category = report::by_category(rows, Kind::Expense);
    let totals = report::totals(rows);
    let money = |amount| format_amount(currency, amount);

    writeln!(out, "Income:   {}", money(totals.income))?;
    writeln!(out, "Expenses: {}", money(totals.expense))?;
    writeln!(out, "BALANCE:  {}", money(totals.balance))?;

    if !by_category.is_empty() {
        writeln!(out, "\n--- Expenses by category ---")?;
        for (category, amount) in &by_category {
            writeln!(out, "{:<20} {}", category, money(*amount))?;
        }
    }

    if !by_month.is_empty() {
        writeln!(out, "\n--- Expenses by month ---")?;
        for (month, amount) in &by_month {
            writeln!(out, "{}  {}", month, money(*amount))?;
        }
    }

    writeln!(out, "\n--- Monthly comparison ---")?;
    writeln!(
        out,
        "{:<7}  {:>14}  {:>14}  {:>14}",
        "month", "Income", "Expense", "Net"
    )?;
    for (month, sums) in &pivot {
        writeln!(
            out,
            "{:<7}  {:>14}  {:>14}  {:>14}",
            month.to_string(),
            money(sums.income),
            money(sums.expense),
            money(sums.net())
        )?;
    }
    Ok(())
}

/// Print the text charts to `out` and write the SVG dashboard to `output`,
/// creating missing parent directories.
pub fn write_charts(
    out: &mut impl Write,
    rows: &[Transaction],
    settings: &Settings,
    output: &Path,
) -> Result<(), LedgerError> {
    let by_category = report::by_category(rows, Kind::Expense);
    let totals = report::totals(rows);
    write!(
        out,
        "{}",
        chart_text::render(&by_category, &totals, &settings.currency)
    )?;

    let svg = chart_svg::dashboard_svg(
        &by_category,
        &totals,
        settings.chart.width,
        settings.chart.height,
    );
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, svg)?;
    Ok(())
}
