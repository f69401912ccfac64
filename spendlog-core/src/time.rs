//! Date utilities: the fixed day-month-year file format and month arithmetic.

use chrono::{Datelike, Months, NaiveDate};

/// Date format used in the expense file, e.g. "15-01-2024".
pub const EXPENSE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a date as stored in the expense file. `None` if it does not match.
///
/// The year must be exactly four digits; chrono's `%Y` alone would read
/// "01-01-24" as year 24.
pub fn parse_expense_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let year = s.rsplit('-').next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, EXPENSE_DATE_FORMAT).ok()
}

pub fn format_expense_date(date: NaiveDate) -> String {
    date.format(EXPENSE_DATE_FORMAT).to_string()
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // day 1 exists in every month
    date.with_day(1).unwrap_or(date)
}

/// `month` shifted forward by `n` calendar months. `None` past chrono's range.
pub fn add_months(month: NaiveDate, n: u32) -> Option<NaiveDate> {
    month.checked_add_months(Months::new(n))
}

/// Whole days from `origin` to `date` (negative if `date` is earlier).
pub fn elapsed_days(origin: NaiveDate, date: NaiveDate) -> i64 {
    (date - origin).num_days()
}

/// Long form for listings: "15 January 2024".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Month label for aggregates: "January 2024".
pub fn format_month(month: NaiveDate) -> String {
    month.format("%B %Y").to_string()
}

/// Short month key: "2024-01".
pub fn month_key(month: NaiveDate) -> String {
    month.format("%Y-%m").to_string()
}
