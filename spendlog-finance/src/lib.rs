//! spendlog-finance: expense file store, collection edits, aggregates, and forecast

pub mod aggregate;
pub mod forecast;
pub mod ledger;
pub mod store;

pub use aggregate::{
    CategoryMonthShare, CumulativeMonth, MonthlyTotal, category_month_breakdown, category_totals,
    chronological, cumulative_monthly, grand_total, monthly_totals,
};
pub use forecast::{DEFAULT_HORIZON_MONTHS, ForecastPoint, MIN_MONTHS, TrendLine, forecast};
pub use ledger::{append, remove_at, update_at};
pub use store::{ExpenseStore, load_expenses, save_expenses};
