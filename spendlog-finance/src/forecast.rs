//! Linear-trend forecast of future monthly spend.
//!
//! Monthly totals are regressed against the number of days since the
//! earliest observed month (ordinary least squares, one predictor with
//! intercept), then the line is evaluated at the first day of each month
//! following the last observed one.

use chrono::NaiveDate;
use serde::Serialize;
use spendlog_core::time::{add_months, elapsed_days};
use spendlog_core::{Error, Expense, Result};
use tracing::debug;

use crate::aggregate::{MonthlyTotal, monthly_totals};

pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// Distinct months of data required before a trend is fitted.
pub const MIN_MONTHS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ForecastPoint {
    /// First day of the forecast month
    pub month: NaiveDate,
    /// Not clamped; a falling trend can go negative
    pub predicted: f64,
}

/// Fitted `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub intercept: f64,
    pub slope: f64,
}

impl TrendLine {
    /// Closed-form least squares. `None` with fewer than two points or
    /// when every `x` is equal.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            intercept: mean_y - slope * mean_x,
            slope,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Forecast the `horizon_months` months after the last month with data.
///
/// Fails with `Error::InsufficientData` when fewer than `MIN_MONTHS`
/// distinct months have a valid date.
pub fn forecast(records: &[Expense], horizon_months: u32) -> Result<Vec<ForecastPoint>> {
    forecast_monthly(&monthly_totals(records), horizon_months)
}

/// Same as `forecast`, from precomputed monthly totals (ascending).
pub fn forecast_monthly(monthly: &[MonthlyTotal], horizon_months: u32) -> Result<Vec<ForecastPoint>> {
    let insufficient = || Error::InsufficientData {
        months: monthly.len(),
        required: MIN_MONTHS,
    };
    if monthly.len() < MIN_MONTHS {
        return Err(insufficient());
    }
    let (Some(first), Some(last)) = (monthly.first(), monthly.last()) else {
        return Err(insufficient());
    };
    let origin = first.month;

    let points: Vec<(f64, f64)> = monthly
        .iter()
        .map(|m| (elapsed_days(origin, m.month) as f64, m.total))
        .collect();
    // distinct months always give distinct x values
    let line = TrendLine::fit(&points).ok_or_else(insufficient)?;
    debug!(
        months = monthly.len(),
        slope = line.slope,
        intercept = line.intercept,
        "fitted monthly trend"
    );

    Ok((1..=horizon_months)
        .map_while(|i| add_months(last.month, i))
        .map(|month| ForecastPoint {
            month,
            predicted: line.predict(elapsed_days(origin, month) as f64),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;
    use spendlog_core::time::month_start;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn exp(date: &str, amount: f64) -> Expense {
        Expense {
            date: date.to_string(),
            description: String::new(),
            amount,
            category: "General".to_string(),
        }
    }

    #[test]
    fn test_fit_exact_line() {
        let line = TrendLine::fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-12);
        assert!((line.intercept - 1.0).abs() < 1e-12);
        assert!((line.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_degenerate() {
        assert!(TrendLine::fit(&[]).is_none());
        assert!(TrendLine::fit(&[(1.0, 1.0)]).is_none());
        assert!(TrendLine::fit(&[(1.0, 1.0), (1.0, 2.0)]).is_none());
    }

    #[test]
    fn test_two_months_is_insufficient() {
        let records = vec![exp("01-01-2024", 100.0), exp("01-02-2024", 200.0)];
        let err = forecast(&records, DEFAULT_HORIZON_MONTHS).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { months: 2, required: 3 }));
        assert!(err.to_string().starts_with("insufficient data: need at least 3 months"));
    }

    #[test]
    fn test_undated_records_do_not_count_as_months() {
        let records = vec![
            exp("01-01-2024", 100.0),
            exp("01-02-2024", 200.0),
            exp("bad", 300.0),
        ];
        assert!(forecast(&records, 6).is_err());
        assert!(forecast(&[], 6).is_err());
    }

    #[test]
    fn test_two_digit_year_does_not_count_as_month() {
        let records = vec![
            exp("15-03-24", 50.0),
            exp("01-01-2024", 100.0),
            exp("01-02-2024", 200.0),
        ];
        assert!(matches!(
            forecast(&records, 1),
            Err(Error::InsufficientData { months: 2, required: 3 })
        ));
    }

    #[test]
    fn test_horizon_stops_at_calendar_limit() {
        let last = month_start(NaiveDate::MAX);
        let monthly: Vec<MonthlyTotal> = (0..3)
            .rev()
            .map(|back| MonthlyTotal {
                month: last.checked_sub_months(Months::new(back)).unwrap(),
                total: 10.0,
            })
            .collect();
        assert!(forecast_monthly(&monthly, u32::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_forecast_points_serialize_for_charts() {
        let point = ForecastPoint {
            month: ymd(2024, 4, 1),
            predicted: 402.5,
        };
        let value = serde_json::to_value(point).unwrap();
        assert_eq!(value["month"], "2024-04-01");
        assert_eq!(value["predicted"], 402.5);
    }

    #[test]
    fn test_rising_trend() {
        let records = vec![
            exp("01-01-2024", 100.0),
            exp("10-02-2024", 200.0),
            exp("20-03-2024", 300.0),
        ];
        let points = forecast(&records, DEFAULT_HORIZON_MONTHS).unwrap();

        assert_eq!(points.len(), 6);
        assert_eq!(points[0].month, ymd(2024, 4, 1));
        assert_eq!(points[5].month, ymd(2024, 9, 1));
        // months are 31/29 days apart, so the fit is only close to 100/month
        assert!((points[0].predicted - 400.0).abs() < 5.0, "got {}", points[0].predicted);
        for w in points.windows(2) {
            assert!(w[0].month < w[1].month);
            assert!(w[1].predicted > w[0].predicted);
        }
    }

    #[test]
    fn test_forecast_crosses_year_boundary() {
        let records = vec![
            exp("01-10-2024", 10.0),
            exp("01-11-2024", 10.0),
            exp("01-12-2024", 10.0),
        ];
        let points = forecast(&records, 2).unwrap();
        assert_eq!(points[0].month, ymd(2025, 1, 1));
        assert_eq!(points[1].month, ymd(2025, 2, 1));
        for p in &points {
            assert!((p.predicted - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_falling_trend_is_not_clamped() {
        let records = vec![
            exp("01-01-2024", 300.0),
            exp("01-02-2024", 150.0),
            exp("01-03-2024", 0.0),
        ];
        let points = forecast(&records, 6).unwrap();
        assert!(points.last().unwrap().predicted < 0.0);
    }

    #[test]
    fn test_zero_horizon() {
        let records = vec![
            exp("01-01-2024", 1.0),
            exp("01-02-2024", 2.0),
            exp("01-03-2024", 3.0),
        ];
        assert!(forecast(&records, 0).unwrap().is_empty());
    }

    #[test]
    fn test_deterministic() {
        let records = vec![
            exp("03-01-2024", 12.5),
            exp("09-02-2024", 99.1),
            exp("17-04-2024", 41.0),
            exp("28-04-2024", 3.3),
        ];
        let a = forecast(&records, 6).unwrap();
        let b = forecast(&records, 6).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.month, y.month);
            assert_eq!(x.predicted.to_bits(), y.predicted.to_bits());
        }
    }
}
