//! Read and write the expense file.
//!
//! UTF-8 CSV, optionally prefixed with a byte-order marker, header row:
//! Tarih,Açıklama,Miktar,Kategori
//!
//! `Kategori` may be missing on read; every row then gets the default
//! category. Saving always rewrites the whole file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use spendlog_core::{DEFAULT_CATEGORY, Error, Expense, Result};
use tracing::debug;

pub const COL_DATE: &str = "Tarih";
pub const COL_DESCRIPTION: &str = "Açıklama";
pub const COL_AMOUNT: &str = "Miktar";
pub const COL_CATEGORY: &str = "Kategori";

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Handle on the expense file at a fixed path.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    path: PathBuf,
}

impl ExpenseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Expense>> {
        load_expenses(&self.path)
    }

    pub fn save(&self, records: &[Expense]) -> Result<()> {
        save_expenses(&self.path, records)
    }
}

/// Load every record in file order. A missing file is an empty collection.
pub fn load_expenses(path: impl AsRef<Path>) -> Result<Vec<Expense>> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no expense file, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let records = parse_expenses(bytes.strip_prefix(BOM).unwrap_or(&bytes))?;
    debug!(path = %path.display(), count = records.len(), "loaded expenses");
    Ok(records)
}

/// Parse CSV content (without byte-order marker) into records.
pub fn parse_expenses(data: &[u8]) -> Result<Vec<Expense>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(data);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let date_col = column(COL_DATE).ok_or_else(|| Error::MissingColumn(COL_DATE.into()))?;
    let desc_col =
        column(COL_DESCRIPTION).ok_or_else(|| Error::MissingColumn(COL_DESCRIPTION.into()))?;
    let amount_col = column(COL_AMOUNT).ok_or_else(|| Error::MissingColumn(COL_AMOUNT.into()))?;
    let category_col = column(COL_CATEGORY);

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| Error::Parse {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let amount_text = record.get(amount_col).unwrap_or("").trim();
        let amount: f64 = amount_text
            .parse()
            .ok()
            .filter(|a: &f64| a.is_finite())
            .ok_or_else(|| Error::Parse {
                line,
                message: format!("amount '{amount_text}' is not a number"),
            })?;

        let category = category_col
            .and_then(|i| record.get(i))
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        out.push(Expense {
            date: record.get(date_col).unwrap_or("").trim().to_string(),
            description: record.get(desc_col).unwrap_or("").to_string(),
            amount,
            category: category.to_string(),
        });
    }

    Ok(out)
}

/// Overwrite the file with `records` in collection order.
///
/// Not atomic: an interrupted write can leave a truncated file.
pub fn save_expenses(path: impl AsRef<Path>, records: &[Expense]) -> Result<()> {
    let path = path.as_ref();
    let mut file = fs::File::create(path)?;
    file.write_all(BOM)?;

    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record([COL_DATE, COL_DESCRIPTION, COL_AMOUNT, COL_CATEGORY])?;
    for r in records {
        let amount = r.amount.to_string();
        wtr.write_record([
            r.date.as_str(),
            r.description.as_str(),
            amount.as_str(),
            r.category.as_str(),
        ])?;
    }
    wtr.flush()?;

    debug!(path = %path.display(), count = records.len(), "saved expenses");
    Ok(())
}
