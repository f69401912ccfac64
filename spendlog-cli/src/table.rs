//! Plain-text rendering of records and aggregates.

use std::collections::BTreeMap;
use std::fmt::Write;

use spendlog_core::Expense;
use spendlog_core::time::{format_long_date, format_month, month_key};
use spendlog_finance::{CategoryMonthShare, CumulativeMonth, ForecastPoint, chronological};

const BAR_WIDTH: usize = 30;

/// Raw listing in date order. Index column is the position used by
/// `delete` and `edit`.
pub fn render_expenses(records: &[Expense], currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<18}  {:<14}  {:>12}  Description",
        "#", "Date", "Category", format!("Amount ({currency})")
    );
    for (index, r) in chronological(records) {
        let date = r.parsed_date().map(format_long_date).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>4}  {:<18}  {:<14}  {:>12.2}  {}",
            index, date, r.category, r.amount, r.description
        );
    }
    out
}

/// Category totals, largest first, with a proportional bar.
pub fn render_category_totals(
    totals: &BTreeMap<String, f64>,
    grand_total: f64,
    currency: &str,
) -> String {
    let mut rows: Vec<(&String, f64)> = totals.iter().map(|(c, a)| (c, *a)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    let max = rows.iter().map(|(_, a)| a.abs()).fold(0.0, f64::max);

    let mut out = String::new();
    let _ = writeln!(out, "Total: {grand_total:.2} {currency}\n");
    for (category, amount) in rows {
        let label = format!("{category} ({amount:.2} {currency})");
        let _ = writeln!(out, "{:<32}  {}", label, bar(amount.abs(), max));
    }
    out
}

pub fn render_breakdown(shares: &[CategoryMonthShare], currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14}  {:<7}  {:>14}  {:>6}",
        "Category", "Month", format!("Total ({currency})"), "%"
    );
    for s in shares {
        let _ = writeln!(
            out,
            "{:<14}  {:<7}  {:>14.2}  {:>6.1}",
            s.category,
            month_key(s.month),
            s.total,
            s.percentage
        );
    }
    out
}

pub fn render_cumulative(months: &[CumulativeMonth], currency: &str) -> String {
    let mut out = String::new();
    let total = months.last().map(|m| m.running_total).unwrap_or(0.0);
    let _ = writeln!(out, "Total spend: {total:.2} {currency}\n");
    let _ = writeln!(
        out,
        "{:<16}  {:>14}  {:>14}",
        "Month", "Monthly", "Cumulative"
    );
    for m in months {
        let _ = writeln!(
            out,
            "{:<16}  {:>14.2}  {:>14.2}",
            format_month(m.month),
            m.amount,
            m.running_total
        );
    }
    out
}

pub fn render_forecast(points: &[ForecastPoint], currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16}  {:>16}", "Month", format!("Forecast ({currency})"));
    for p in points {
        let _ = writeln!(out, "{:<16}  {:>16.2}", format_month(p.month), p.predicted);
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(width.min(BAR_WIDTH))
}
