//! Positional mutation of the expense collection.
//!
//! Records are addressed by their index in file order. Indices are not
//! stable: removing a record shifts every later record down by one, so an
//! index is only valid against the collection it was read from.

use spendlog_core::{Error, Expense, Result};
use tracing::debug;

/// Append `expense` at the end.
pub fn append(mut records: Vec<Expense>, expense: Expense) -> Vec<Expense> {
    records.push(expense);
    records
}

/// Remove the record at `index`, shifting later records down.
pub fn remove_at(mut records: Vec<Expense>, index: usize) -> Result<Vec<Expense>> {
    check_index(&records, index)?;
    let removed = records.remove(index);
    debug!(index, description = %removed.description, "removed expense");
    Ok(records)
}

/// Replace every field of the record at `index`.
pub fn update_at(mut records: Vec<Expense>, index: usize, expense: Expense) -> Result<Vec<Expense>> {
    check_index(&records, index)?;
    records[index] = expense;
    debug!(index, "updated expense");
    Ok(records)
}

fn check_index(records: &[Expense], index: usize) -> Result<()> {
    if index >= records.len() {
        return Err(Error::Index {
            index,
            len: records.len(),
        });
    }
    Ok(())
}
