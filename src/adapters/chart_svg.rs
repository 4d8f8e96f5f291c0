//! SVG chart rendering for the expense breakdown and the income/expense
//! share.

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::report::Totals;

pub const EXPENSE_COLOR: &str = "#ff6b6b";
pub const INCOME_COLOR: &str = "#1dd1a1";
const BACKGROUND: &str = "#f8f9fa";
const PADDING: f64 = 40.0;
/// Room under the plot for rotated category labels.
const LABEL_BAND: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub share: f64,
    /// Radians, counter-clockwise from 3 o'clock.
    pub start: f64,
    pub end: f64,
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0).max(0.0)
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Lay out one bar per value inside a `plot_width` x `plot_height` area,
/// scaled so the largest value fills the height.
pub fn bar_geometry(values: &[f64], plot_width: f64, plot_height: f64) -> Vec<Bar> {
    if values.is_empty() {
        return Vec::new();
    }
    let max = values.iter().copied().fold(0.0, f64::max);
    let slot = plot_width / values.len() as f64;
    let width = slot * 0.7;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Bar {
            x: i as f64 * slot + (slot - width) / 2.0,
            width,
            height: if max > 0.0 { v / max * plot_height } else { 0.0 },
        })
        .collect()
}

/// Split a full turn between `values`, starting at 12 o'clock.
pub fn pie_slices(values: &[f64]) -> Vec<Slice> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = FRAC_PI_2;
    values
        .iter()
        .map(|&v| {
            let share = v / total;
            let slice = Slice {
                share,
                start,
                end: start + share * TAU,
            };
            start = slice.end;
            slice
        })
        .collect()
}

fn placeholder(out: &mut String, width: f64, height: f64, message: &str) {
    let _ = write!(
        out,
        r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="#6c757d" font-size="14">{}</text>"##,
        width / 2.0,
        height / 2.0,
        escape_xml(message)
    );
}

fn title(out: &mut String, width: f64, text: &str) {
    let _ = write!(
        out,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
        width / 2.0,
        escape_xml(text)
    );
}

fn bar_body(by_category: &BTreeMap<String, Decimal>, width: f64, height: f64) -> String {
    let mut out = String::new();
    title(&mut out, width, "Expenses by Category");

    let values: Vec<f64> = by_category.values().map(|v| to_f64(*v)).collect();
    if values.iter().all(|v| *v <= 0.0) {
        placeholder(&mut out, width, height, "No expenses recorded");
        return out;
    }

    let plot_width = (width - 2.0 * PADDING).max(0.0);
    let plot_height = (height - 2.0 * PADDING - LABEL_BAND).max(0.0);
    let baseline = PADDING + plot_height;

    let _ = write!(
        out,
        r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#343a40"/>"##,
        PADDING,
        baseline,
        PADDING + plot_width,
        baseline
    );

    let bars = bar_geometry(&values, plot_width, plot_height);
    for ((category, amount), bar) in by_category.iter().zip(&bars) {
        let x = PADDING + bar.x;
        let y = baseline - bar.height;
        let center = x + bar.width / 2.0;
        let _ = write!(
            out,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {:.2}</title></rect>"#,
            x,
            y,
            bar.width,
            bar.height,
            EXPENSE_COLOR,
            escape_xml(category),
            amount
        );
        let _ = write!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11">{:.2}</text>"#,
            center,
            y - 4.0,
            amount
        );
        let _ = write!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" transform="rotate(-45 {:.1} {:.1})">{}</text>"#,
            center,
            baseline + 14.0,
            center,
            baseline + 14.0,
            escape_xml(category)
        );
    }
    out
}

fn pie_body(totals: &Totals, width: f64, height: f64) -> String {
    let mut out = String::new();
    title(&mut out, width, "Income vs Expenses");

    let parts = [
        ("Income", to_f64(totals.income), INCOME_COLOR),
        ("Expense", to_f64(totals.expense), EXPENSE_COLOR),
    ];
    let values: Vec<f64> = parts.iter().map(|p| p.1).collect();
    let slices = pie_slices(&values);
    if slices.is_empty() {
        placeholder(&mut out, width, height, "No transactions recorded");
        return out;
    }

    let radius = ((width - 2.0 * PADDING).min(height - 2.0 * PADDING - 20.0) / 2.0).max(1.0);
    let cx = width / 2.0;
    let cy = PADDING + 20.0 + radius;
    let point = |angle: f64, r: f64| (cx + r * angle.cos(), cy - r * angle.sin());

    for ((label, _, color), slice) in parts.iter().zip(&slices) {
        if slice.share <= 0.0 {
            continue;
        }
        if slice.share >= 1.0 {
            let _ = write!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                cx, cy, radius, color
            );
        } else {
            let (x0, y0) = point(slice.start, radius);
            let (x1, y1) = point(slice.end, radius);
            let large_arc = if slice.share > 0.5 { 1 } else { 0 };
            let _ = write!(
                out,
                r#"<path d="M {:.1} {:.1} L {:.1} {:.1} A {:.1} {:.1} 0 {} 0 {:.1} {:.1} Z" fill="{}"/>"#,
                cx, cy, x0, y0, radius, radius, large_arc, x1, y1, color
            );
        }

        let mid = (slice.start + slice.end) / 2.0;
        let (lx, ly) = point(mid, radius * 0.6);
        let _ = write!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{:.1}%</text>"#,
            lx,
            ly,
            slice.share * 100.0
        );
        let (nx, ny) = point(mid, radius * 1.15);
        let _ = write!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
            nx, ny, label
        );
    }
    out
}

fn document(width: u32, height: u32, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif"><rect width="{w}" height="{h}" fill="{bg}"/>{body}</svg>"#,
        w = width,
        h = height,
        bg = BACKGROUND,
        body = body
    )
}

#[cfg(test)]
fn expense_bar_svg(by_category: &BTreeMap<String, Decimal>, width: u32, height: u32) -> String {
    document(
        width,
        height,
        &bar_body(by_category, f64::from(width), f64::from(height)),
    )
}

#[cfg(test)]
fn balance_pie_svg(totals: &Totals, width: u32, height: u32) -> String {
    document(
        width,
        height,
        &pie_body(totals, f64::from(width), f64::from(height)),
    )
}

/// Bar chart on the left half, pie chart on the right half.
pub fn dashboard_svg(
    by_category: &BTreeMap<String, Decimal>,
    totals: &Totals,
    width: u32,
    height: u32,
) -> String {
    let half = f64::from(width) / 2.0;
    let h = f64::from(height);
    let body = format!(
        r#"<g>{}</g><g transform="translate({:.1},0)">{}</g>"#,
        bar_body(by_category, half, h),
        half,
        pie_body(totals, half, h)
    );
    document(width, height, &body)
}
