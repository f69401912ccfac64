//! Expense record types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::{format_expense_date, parse_expense_date};

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "General";

/// Categories offered for selection. Records may still carry any other label.
pub const CATEGORIES: [&str; 14] = [
    "Automotive",
    "Bills",
    "Clothing",
    "Entertainment",
    "Food",
    "Fuel",
    "General",
    "Gifts",
    "Health",
    "Holiday",
    "Home",
    "Kids",
    "Shopping",
    "Sports",
];

/// A single logged expense, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    /// Date text in DD-MM-YYYY form. Kept verbatim so records with
    /// unparseable dates are still listed.
    pub date: String,
    pub description: String,
    /// Sign is not restricted
    pub amount: f64,
    pub category: String,
}

impl Expense {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date: format_expense_date(date),
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    /// Parsed date, or `None` if the stored text is not DD-MM-YYYY.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_expense_date(&self.date)
    }

    /// One-line label used when picking a record to delete or edit.
    pub fn summary_label(&self) -> String {
        format!(
            "{} - {} - {:.2} - {}",
            self.date, self.category, self.amount, self.description
        )
    }
}

/// Form data submitted for add/update, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
}

impl ExpenseInput {
    /// Validate raw form text into an input. Fails before any mutation happens.
    pub fn from_form(
        date: NaiveDate,
        description: &str,
        amount_text: &str,
        category: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            date,
            description: description.to_string(),
            amount: parse_amount(amount_text)?,
            category: category.map(str::to_string),
        })
    }

    pub fn into_expense(self) -> Expense {
        let category = category_or_default(self.category.as_deref());
        Expense::new(self.date, self.description, self.amount, category)
    }
}

/// `category`, or `DEFAULT_CATEGORY` when absent or blank.
pub fn category_or_default(category: Option<&str>) -> String {
    match category {
        Some(c) if !c.trim().is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// Parse user-entered amount text. Rejects non-numeric and non-finite values.
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| Error::Validation(format!("amount must be a number, got '{trimmed}'")))?;
    if !amount.is_finite() {
        return Err(Error::Validation(format!(
            "amount must be a finite number, got '{trimmed}'"
        )));
    }
    Ok(amount)
}

/// True if `category` is one of the offered labels.
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}
