//! spendlog-core: expense types, date helpers, and errors shared by the workspace

pub mod error;
pub mod expense;
pub mod time;

pub use error::{Error, Result};
pub use expense::{
    CATEGORIES, DEFAULT_CATEGORY, Expense, ExpenseInput, category_or_default, is_known_category,
    parse_amount,
};
