//! Aggregations over the expense collection: per month, per category,
//! category share of each month, and running totals.
//!
//! Records whose date does not parse are left out of every date-based
//! aggregate but still count toward `category_totals` and `grand_total`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use spendlog_core::Expense;
use spendlog_core::time::month_start;
use tracing::debug;

/// Sum of amounts for one calendar month.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MonthlyTotal {
    /// First day of the month
    pub month: NaiveDate,
    pub total: f64,
}

/// One category's total within one month and its share of that month.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryMonthShare {
    pub category: String,
    pub month: NaiveDate,
    pub total: f64,
    /// 0-100. Zero when the month's total is zero.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CumulativeMonth {
    pub month: NaiveDate,
    pub amount: f64,
    pub running_total: f64,
}

/// Records with a valid date, paired with their month.
fn dated(records: &[Expense]) -> Vec<(NaiveDate, &Expense)> {
    let out: Vec<_> = records
        .iter()
        .filter_map(|r| r.parsed_date().map(|d| (month_start(d), r)))
        .collect();

    let skipped = records.len() - out.len();
    if skipped > 0 {
        debug!(skipped, "excluding records with unparseable dates from monthly aggregates");
    }
    out
}

/// Totals per month, ascending.
pub fn monthly_totals(records: &[Expense]) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (month, r) in dated(records) {
        *by_month.entry(month).or_insert(0.0) += r.amount;
    }

    by_month
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Totals per category label, as written (no case folding).
pub fn category_totals(records: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        *totals.entry(r.category.clone()).or_insert(0.0) += r.amount;
    }
    totals
}

/// Sum of every amount, dated or not.
pub fn grand_total(records: &[Expense]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}

/// Per (category, month) totals and their percentage of the month's total,
/// ordered by category then month.
pub fn category_month_breakdown(records: &[Expense]) -> Vec<CategoryMonthShare> {
    let rows = dated(records);

    let mut month_totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut cells: BTreeMap<(&str, NaiveDate), f64> = BTreeMap::new();
    for (month, r) in &rows {
        *month_totals.entry(*month).or_insert(0.0) += r.amount;
        *cells.entry((r.category.as_str(), *month)).or_insert(0.0) += r.amount;
    }

    cells
        .into_iter()
        .map(|((category, month), total)| {
            let month_total = month_totals.get(&month).copied().unwrap_or(0.0);
            let percentage = if month_total == 0.0 {
                0.0
            } else {
                100.0 * total / month_total
            };
            CategoryMonthShare {
                category: category.to_string(),
                month,
                total,
                percentage,
            }
        })
        .collect()
}

/// Monthly totals with a running sum, ascending.
pub fn cumulative_monthly(records: &[Expense]) -> Vec<CumulativeMonth> {
    let mut running_total = 0.0;
    monthly_totals(records)
        .into_iter()
        .map(|m| {
            running_total += m.total;
            CumulativeMonth {
                month: m.month,
                amount: m.total,
                running_total,
            }
        })
        .collect()
}

/// Listing order: ascending by date, undated records last. Ties keep file
/// order. Each entry carries its index in `records`.
pub fn chronological(records: &[Expense]) -> Vec<(usize, &Expense)> {
    let mut rows: Vec<(usize, &Expense)> = records.iter().enumerate().collect();
    // None sorts before Some, so key on (is_none, date)
    rows.sort_by_key(|(_, r)| {
        let date = r.parsed_date();
        (date.is_none(), date)
    });
    rows
}
