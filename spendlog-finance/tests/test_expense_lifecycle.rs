use chrono::NaiveDate;
use spendlog_core::{Error, Expense, ExpenseInput};
use spendlog_finance::{
    ExpenseStore, append, category_month_breakdown, category_totals, cumulative_monthly,
    forecast, grand_total, monthly_totals, remove_at, update_at,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn input(date: NaiveDate, desc: &str, amount: &str, category: &str) -> Expense {
    ExpenseInput::from_form(date, desc, amount, Some(category))
        .unwrap()
        .into_expense()
}

/// Each action reloads the file, mutates, and rewrites it in full.
fn add(store: &ExpenseStore, expense: Expense) {
    let records = store.load().unwrap();
    store.save(&append(records, expense)).unwrap();
}

#[test]
fn test_add_delete_edit_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = ExpenseStore::new(dir.path().join("expenses.csv"));

    add(&store, input(ymd(2024, 1, 1), "Gas", "50", "Fuel"));
    add(&store, input(ymd(2024, 1, 15), "Food", "30.0", "Food"));
    add(&store, input(ymd(2024, 2, 1), "Gas", "60", "Fuel"));
    add(&store, input(ymd(2024, 2, 3), "Typo", "999", "General"));

    // delete the typo
    let records = store.load().unwrap();
    assert_eq!(records.len(), 4);
    store.save(&remove_at(records, 3).unwrap()).unwrap();

    let records = store.load().unwrap();
    assert_eq!(monthly_totals(&records)[0].total, 80.0);
    assert_eq!(monthly_totals(&records)[1].total, 60.0);
    let totals = category_totals(&records);
    assert_eq!(totals["Fuel"], 110.0);
    assert_eq!(totals["Food"], 30.0);

    // edit the second record
    let edited = input(ymd(2024, 3, 5), "Dinner", "45.5", "Food");
    store.save(&update_at(records, 1, edited.clone()).unwrap()).unwrap();

    let records = store.load().unwrap();
    assert_eq!(records[1], edited);
    assert_eq!(records.len(), 3);

    let cumulative = cumulative_monthly(&records);
    assert_eq!(cumulative.len(), 3);
    assert_eq!(cumulative.last().unwrap().running_total, grand_total(&records));
}

#[test]
fn test_invalid_index_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = ExpenseStore::new(dir.path().join("expenses.csv"));
    add(&store, input(ymd(2024, 1, 1), "Gas", "50", "Fuel"));

    let records = store.load().unwrap();
    let err = remove_at(records, 1).unwrap_err();
    assert!(matches!(err, Error::Index { index: 1, len: 1 }));
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn test_hand_edited_dates_stay_listed_but_leave_aggregates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    std::fs::write(
        &path,
        "Tarih,Açıklama,Miktar,Kategori\n\
         01-01-2024,Gas,50,Fuel\n\
         2024/01/20,Bus,5,Fuel\n\
         01-02-2024,Gas,60,Fuel\n",
    )
    .unwrap();

    let records = ExpenseStore::new(&path).load().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].date, "2024/01/20");

    let monthly: f64 = monthly_totals(&records).iter().map(|m| m.total).sum();
    assert_eq!(monthly, 110.0);
    assert_eq!(category_totals(&records)["Fuel"], 115.0);
    assert!(category_month_breakdown(&records).iter().all(|s| s.percentage == 100.0));
}

#[test]
fn test_forecast_from_stored_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = ExpenseStore::new(dir.path().join("expenses.csv"));

    add(&store, input(ymd(2024, 1, 1), "Rent", "100", "Home"));
    add(&store, input(ymd(2024, 2, 1), "Rent", "200", "Home"));
    let err = forecast(&store.load().unwrap(), 6).unwrap_err();
    assert!(err.is_informational());

    add(&store, input(ymd(2024, 3, 1), "Rent", "300", "Home"));
    let points = forecast(&store.load().unwrap(), 6).unwrap();
    assert_eq!(points.len(), 6);
    assert_eq!(points[0].month, ymd(2024, 4, 1));
    assert!((points[0].predicted - 400.0).abs() < 5.0);
}
