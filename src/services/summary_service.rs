//! Summary Service
//!
//! Derives the reference statistics that claims are checked against.
//! Runs once per verification call, before any claim is looked at.

use crate::dataset::{columns, Dataset};
use crate::error::{CheckError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// First and last date covered by the dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Lowest low and highest high
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Ground truth for claim verification
///
/// Optional indicators are `None` when the column is absent or holds no
/// values; they are never defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStatistics {
    pub row_count: usize,
    pub date_range: DateRange,
    pub price_range: PriceRange,
    pub first_close: f64,
    pub last_close: f64,
    /// Close on the row carrying the latest date
    pub latest_close: Option<f64>,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub avg_volume: f64,
    pub max_volume: f64,
    pub moving_average_20: Option<f64>,
    pub moving_average_50: Option<f64>,
    pub volatility_pct: Option<f64>,
}

impl ReferenceStatistics {
    /// Percentage change, rejected when the first close makes it non-finite
    pub fn checked_change_pct(&self) -> Result<f64> {
        if self.price_change_pct.is_finite() {
            Ok(self.price_change_pct)
        } else {
            Err(CheckError::Arithmetic(format!(
                "price change percentage is undefined for a first close of {}",
                self.first_close
            )))
        }
    }
}

impl fmt::Display for ReferenceStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.date_range.end_iso();
        writeln!(f, "Date Range: {} to {}", self.date_range.start_iso(), end)?;
        writeln!(
            f,
            "Price Range: Low ${:.2} to High ${:.2}",
            self.price_range.min, self.price_range.max
        )?;
        match self.latest_close {
            Some(close) => writeln!(f, "Latest Close (as of {}): ${:.2}", end, close)?,
            None => writeln!(f, "Last Close: ${:.2}", self.last_close)?,
        }
        if self.row_count > 1 {
            writeln!(
                f,
                "Overall Price Change: {:.2} ({:.2}%)",
                self.price_change, self.price_change_pct
            )?;
        }
        writeln!(f, "Average Volume: {:.0}", self.avg_volume)?;
        write!(f, "Maximum Volume: {:.0}", self.max_volume)?;

        if let (Some(ma20), Some(ma50)) = (self.moving_average_20, self.moving_average_50) {
            write!(f, "\nLatest 20-day Moving Average: ${:.2}", ma20)?;
            write!(f, "\nLatest 50-day Moving Average: ${:.2}", ma50)?;
        }
        if let Some(volatility) = self.volatility_pct {
            write!(f, "\nLatest 20-day Volatility: {:.2}%", volatility)?;
        }
        Ok(())
    }
}

/// Summary service for business logic
pub struct SummaryService;

impl SummaryService {
    /// Compute reference statistics, failing if a mandatory column is unusable
    pub fn summarize(dataset: &Dataset) -> Result<ReferenceStatistics> {
        info!(
            "SummaryService::summarize - {} rows, {} columns",
            dataset.len(),
            dataset.column_names().count()
        );

        for name in columns::REQUIRED {
            if !dataset.has_column(name) {
                return Err(CheckError::MissingColumn(name.to_string()));
            }
        }
        dataset.validate()?;
        if dataset.is_empty() {
            return Err(CheckError::EmptyDataset);
        }

        let dates = dataset.dates(columns::DATE)?;
        let date_range = DateRange {
            start: dates.iter().flatten().min().copied().ok_or_else(|| empty(columns::DATE))?,
            end: dates.iter().flatten().max().copied().ok_or_else(|| empty(columns::DATE))?,
        };

        let price_range = PriceRange {
            min: present(dataset.numeric(columns::LOW)?)
                .reduce(f64::min)
                .ok_or_else(|| empty(columns::LOW))?,
            max: present(dataset.numeric(columns::HIGH)?)
                .reduce(f64::max)
                .ok_or_else(|| empty(columns::HIGH))?,
        };

        let close = dataset.numeric(columns::CLOSE)?;
        let first_close = present(close).next().ok_or_else(|| empty(columns::CLOSE))?;
        let last_close = present(close).last().ok_or_else(|| empty(columns::CLOSE))?;
        let latest_close = dates
            .iter()
            .rposition(|date| *date == Some(date_range.end))
            .and_then(|row| close[row])
            .filter(|value| value.is_finite());
        let price_change = last_close - first_close;
        let price_change_pct = price_change / first_close * 100.0;

        let volume: Vec<f64> = present(dataset.numeric(columns::VOLUME)?).collect();
        if volume.is_empty() {
            return Err(empty(columns::VOLUME));
        }
        let avg_volume = volume.iter().sum::<f64>() / volume.len() as f64;
        let max_volume = volume.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let stats = ReferenceStatistics {
            row_count: dataset.len(),
            date_range,
            price_range,
            first_close,
            last_close,
            latest_close,
            price_change,
            price_change_pct,
            avg_volume,
            max_volume,
            moving_average_20: latest_optional(dataset, columns::MA_20),
            moving_average_50: latest_optional(dataset, columns::MA_50),
            volatility_pct: latest_optional(dataset, columns::VOLATILITY_20D).map(|v| v * 100.0),
        };

        debug!("Reference statistics:\n{}", stats);
        Ok(stats)
    }
}

fn empty(column: &str) -> CheckError {
    CheckError::EmptyColumn(column.to_string())
}

/// Present, finite values in row order
fn present(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().flatten().copied().filter(|v| v.is_finite())
}

/// Latest present value of an optional numeric column
fn latest_optional(dataset: &Dataset, name: &str) -> Option<f64> {
    match dataset.numeric(name) {
        Ok(values) => present(values).last(),
        Err(e) => {
            debug!("Optional column {} unavailable: {}", name, e);
            None
        }
    }
}
