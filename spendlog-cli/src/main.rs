use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spendlog_core::time::{format_expense_date, parse_expense_date};
use spendlog_core::{
    CATEGORIES, Expense, ExpenseInput, category_or_default, is_known_category, parse_amount,
};
use spendlog_finance::{
    CategoryMonthShare, ExpenseStore, append, category_month_breakdown, category_totals,
    chronological, cumulative_monthly, forecast, grand_total, remove_at, update_at,
};

mod config;
mod table;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "spendlog", version, about = "Track expenses in a CSV file")]
struct Cli {
    /// Expense file (overrides storage.data_file from config)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense
    Add {
        /// Amount, e.g. 12.50
        #[arg(long)]
        amount: String,

        /// Date as DD-MM-YYYY (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Category (default: General)
        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List expenses in date order
    List {
        #[arg(long)]
        json: bool,
    },

    /// Delete the expense at INDEX (as shown by `list`)
    Delete { index: usize },

    /// Replace fields of the expense at INDEX; omitted fields are kept
    Edit {
        index: usize,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Totals per category and each category's share of every month
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Monthly totals with running total
    Cumulative {
        #[arg(long)]
        json: bool,
    },

    /// Project monthly spend from the linear trend
    Forecast {
        /// Months to project (default: forecast.horizon_months)
        #[arg(long)]
        months: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Print the offered category labels
    ListCategories,

    /// Manage ~/.spendlog/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > warn
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();

    let cfg = config::load_config()?;
    let store = ExpenseStore::new(cfg.data_file(cli.file.as_deref()));
    let currency = cfg.display.currency.as_str();

    match cli.command {
        Command::Add {
            amount,
            date,
            category,
            description,
        } => {
            let expense = cmd_add(
                &store,
                &amount,
                date.as_deref(),
                category.as_deref(),
                &description,
            )?;
            println!("Added: {}", expense.summary_label());
        }

        Command::List { json } => {
            let records = load(&store)?;
            if json {
                print_json(&listed(&records))?;
            } else if records.is_empty() {
                println!("No expenses found.");
            } else {
                print!("{}", table::render_expenses(&records, currency));
            }
        }

        Command::Delete { index } => {
            let removed = cmd_delete(&store, index)?;
            println!("Deleted: {}", removed.summary_label());
        }

        Command::Edit {
            index,
            amount,
            date,
            category,
            description,
        } => {
            let edit = Edit {
                amount,
                date,
                category,
                description,
            };
            let updated = cmd_edit(&store, index, edit)?;
            println!("Updated: {}", updated.summary_label());
        }

        Command::Categories { json } => {
            let records = load(&store)?;
            let report = CategoryReport {
                total: grand_total(&records),
                categories: category_totals(&records),
                breakdown: category_month_breakdown(&records),
            };
            if json {
                print_json(&report)?;
            } else if records.is_empty() {
                println!("No expenses found.");
            } else {
                print!(
                    "{}",
                    table::render_category_totals(&report.categories, report.total, currency)
                );
                println!();
                print!("{}", table::render_breakdown(&report.breakdown, currency));
            }
        }

        Command::Cumulative { json } => {
            let months = cumulative_monthly(&load(&store)?);
            if json {
                print_json(&months)?;
            } else if months.is_empty() {
                println!("No data to show.");
            } else {
                print!("{}", table::render_cumulative(&months, currency));
            }
        }

        Command::Forecast { months, json } => {
            let horizon = months.unwrap_or(cfg.forecast.horizon_months);
            match forecast(&load(&store)?, horizon) {
                Ok(points) if json => print_json(&points)?,
                Ok(points) => print!("{}", table::render_forecast(&points, currency)),
                Err(e) if e.is_informational() => println!("{e}"),
                Err(e) => return Err(e.into()),
            }
        }

        Command::ListCategories => {
            for c in CATEGORIES {
                println!("{c}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

/// Field changes requested by `edit`.
#[derive(Debug, Default)]
struct Edit {
    amount: Option<String>,
    date: Option<String>,
    category: Option<String>,
    description: Option<String>,
}

#[derive(Serialize)]
struct CategoryReport {
    total: f64,
    categories: std::collections::BTreeMap<String, f64>,
    breakdown: Vec<CategoryMonthShare>,
}

#[derive(Serialize)]
struct ListedExpense<'a> {
    index: usize,
    #[serde(flatten)]
    expense: &'a Expense,
}

fn listed(records: &[Expense]) -> Vec<ListedExpense<'_>> {
    chronological(records)
        .into_iter()
        .map(|(index, expense)| ListedExpense { index, expense })
        .collect()
}

fn load(store: &ExpenseStore) -> Result<Vec<Expense>> {
    store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))
}

fn save(store: &ExpenseStore, records: &[Expense]) -> Result<()> {
    store
        .save(records)
        .with_context(|| format!("writing {}", store.path().display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_date_arg(date: &str) -> Result<NaiveDate> {
    match parse_expense_date(date) {
        Some(d) => Ok(d),
        None => bail!("invalid date '{date}' (expected DD-MM-YYYY)"),
    }
}

fn cmd_add(
    store: &ExpenseStore,
    amount: &str,
    date: Option<&str>,
    category: Option<&str>,
    description: &str,
) -> Result<Expense> {
    let date = match date {
        Some(d) => parse_date_arg(d)?,
        None => Local::now().date_naive(),
    };
    // validate before touching the file
    let expense = ExpenseInput::from_form(date, description, amount, category)?.into_expense();
    note_unknown_category(&expense);

    let records = append(load(store)?, expense.clone());
    save(store, &records)?;
    info!(count = records.len(), "expense added");
    Ok(expense)
}

fn note_unknown_category(expense: &Expense) {
    if !is_known_category(&expense.category) {
        warn!(
            category = %expense.category,
            "category is not in the standard list, keeping it as entered"
        );
    }
}

fn cmd_delete(store: &ExpenseStore, index: usize) -> Result<Expense> {
    let records = load(store)?;
    let removed = records.get(index).cloned();
    let records = remove_at(records, index)?;
    save(store, &records)?;
    removed.context("deleted record vanished")
}

fn cmd_edit(store: &ExpenseStore, index: usize, edit: Edit) -> Result<Expense> {
    let records = load(store)?;
    let Some(current) = records.get(index) else {
        bail!(spendlog_core::Error::Index {
            index,
            len: records.len(),
        });
    };

    let date = match edit.date.as_deref() {
        Some(d) => format_expense_date(parse_date_arg(d)?),
        None => current.date.clone(),
    };
    let amount = match edit.amount.as_deref() {
        Some(a) => parse_amount(a)?,
        None => current.amount,
    };
    // date text is kept verbatim when not edited, so this cannot go through
    // ExpenseInput, which needs a parsed date
    let updated = Expense {
        date,
        description: edit.description.unwrap_or_else(|| current.description.clone()),
        amount,
        category: category_or_default(Some(
            edit.category.as_deref().unwrap_or(&current.category),
        )),
    };
    note_unknown_category(&updated);

    let records = update_at(records, index, updated.clone())?;
    save(store, &records)?;
    Ok(updated)
}
