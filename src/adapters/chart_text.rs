//! Terminal rendering of the same charts as [`chart_svg`](super::chart_svg).

use std::collections::BTreeMap;
use std::fmt::Write;

use rust_decimal::Decimal;

use crate::adapters::chart_svg::{bar_geometry, pie_slices, to_f64};
use crate::domain::report::Totals;

/// Characters used by the longest bar.
pub const BAR_WIDTH: usize = 40;

fn bar(length: f64) -> String {
    "█".repeat(length.round() as usize)
}

pub fn render(by_category: &BTreeMap<String, Decimal>, totals: &Totals, currency: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Expenses by Category");
    let values: Vec<f64> = by_category.values().map(|v| to_f64(*v)).collect();
    if values.iter().all(|v| *v <= 0.0) {
        let _ = writeln!(out, "  (no expenses recorded)");
    } else {
        let label_width = by_category.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        let bars = bar_geometry(&values, 0.0, BAR_WIDTH as f64);
        for ((category, amount), geometry) in by_category.iter().zip(&bars) {
            let _ = writeln!(
                out,
                "  {:<width$}  {} {} {:.2}",
                category,
                bar(geometry.height),
                currency,
                amount,
                width = label_width
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Income vs Expenses");
    let shares = pie_slices(&[to_f64(totals.income), to_f64(totals.expense)]);
    if shares.is_empty() {
        let _ = writeln!(out, "  (no transactions recorded)");
    } else {
        for (label, slice) in ["Income", "Expense"].iter().zip(&shares) {
            let _ = writeln!(
                out,
                "  {:<7}  {} {:.1}%",
                label,
                bar(slice.share * BAR_WIDTH as f64),
                slice.share * 100.0
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn longest_bar_fills_width() {
        let mut by_category = BTreeMap::new();
        by_category.insert("Food".to_string(), dec("50"));
        by_category.insert("Transport".to_string(), dec("10"));
        let totals = Totals {
            income: dec("240"),
            expense: dec("60"),
            balance: dec("180"),
        };

        let text = render(&by_category, &totals, "$");
        let food = text.lines().find(|l| l.contains("Food")).unwrap();
        let transport = text.lines().find(|l| l.contains("Transport")).unwrap();
        assert_eq!(food.matches('█').count(), BAR_WIDTH);
        assert_eq!(transport.matches('█').count(), 8);
        assert!(food.ends_with("$ 50.00"));
        assert!(text.contains("80.0%"));
        assert!(text.contains("20.0%"));
    }

    #[test]
    fn empty_ledger_renders_placeholders() {
        let text = render(&BTreeMap::new(), &Totals::default(), "$");
        assert!(text.contains("(no expenses recorded)"));
        assert!(text.contains("(no transactions recorded)"));
    }
}
