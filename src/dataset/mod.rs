//! Tabular dataset consumed by the consistency checker
//!
//! A dataset is a set of named, equally long columns. Numeric columns may
//! hold missing values (`null` in JSON), which every consumer skips rather
//! than reading as zero.

pub mod indicators;
pub mod models;

use crate::error::{CheckError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub use models::Candle;

/// Well-known column names
pub mod columns {
    pub const DATE: &str = "Date";
    pub const OPEN: &str = "Open";
    pub const HIGH: &str = "High";
    pub const LOW: &str = "Low";
    pub const CLOSE: &str = "Close";
    pub const VOLUME: &str = "Volume";
    pub const DAILY_RETURN: &str = "Daily_Return";
    pub const MA_20: &str = "MA_20";
    pub const MA_50: &str = "MA_50";
    pub const VOLATILITY_20D: &str = "Volatility_20d";

    /// Columns that must be present before any claim can be verified
    pub const REQUIRED: [&str; 5] = [DATE, LOW, HIGH, CLOSE, VOLUME];
}

/// A single named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric column with no missing values
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        Column::Numeric(values.into_iter().map(Some).collect())
    }

    /// Text column with no missing values
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Column::Text(values.into_iter().map(|s| Some(s.into())).collect())
    }
}

/// Column-oriented table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    columns: BTreeMap<String, Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column insertion
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    /// Insert or replace a column; its length must match the other columns
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        let others = self.columns.iter().find(|(existing, _)| **existing != name);
        if let Some((_, other)) = others {
            if other.len() != column.len() {
                return Err(CheckError::ColumnLength {
                    column: name,
                    expected: other.len(),
                    actual: column.len(),
                });
            }
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.values().next().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Borrow a numeric column
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.columns.get(name) {
            Some(Column::Numeric(values)) => Ok(values),
            Some(Column::Text(_)) => Err(CheckError::ColumnKind {
                column: name.to_string(),
                expected: "numeric",
            }),
            None => Err(CheckError::MissingColumn(name.to_string())),
        }
    }

    /// Parse a text column as dates; missing cells stay `None`
    pub fn dates(&self, name: &str) -> Result<Vec<Option<NaiveDate>>> {
        let values = match self.columns.get(name) {
            Some(Column::Text(values)) => values,
            Some(Column::Numeric(_)) => {
                return Err(CheckError::ColumnKind {
                    column: name.to_string(),
                    expected: "text dates",
                })
            }
            None => return Err(CheckError::MissingColumn(name.to_string())),
        };

        values
            .iter()
            .map(|cell| match cell {
                Some(raw) => parse_date(raw).map(Some).ok_or_else(|| CheckError::InvalidDate {
                    column: name.to_string(),
                    value: raw.clone(),
                }),
                None => Ok(None),
            })
            .collect()
    }

    /// Check that every column has the same number of rows
    pub fn validate(&self) -> Result<()> {
        let expected = self.len();
        for (name, column) in &self.columns {
            if column.len() != expected {
                return Err(CheckError::ColumnLength {
                    column: name.clone(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(())
    }

    /// Build the standard OHLCV frame from candles
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut columns = BTreeMap::new();
        columns.insert(
            columns::DATE.to_string(),
            Column::from_strings(candles.iter().map(|c| c.date.format("%Y-%m-%d").to_string())),
        );
        columns.insert(columns::OPEN.to_string(), Column::from_values(candles.iter().map(|c| c.open)));
        columns.insert(columns::HIGH.to_string(), Column::from_values(candles.iter().map(|c| c.high)));
        columns.insert(columns::LOW.to_string(), Column::from_values(candles.iter().map(|c| c.low)));
        columns.insert(columns::CLOSE.to_string(), Column::from_values(candles.iter().map(|c| c.close)));
        columns.insert(
            columns::VOLUME.to_string(),
            Column::from_values(candles.iter().map(|c| c.volume as f64)),
        );
        Self { columns }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Parse `YYYY-MM-DD`, optionally followed by a time part
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day = value.get(..10)?;
    let rest = value.get(10..)?;
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
