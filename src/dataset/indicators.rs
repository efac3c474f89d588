//! Derived indicator columns
//!
//! Rolling windows only produce a value once the window is full and every
//! value inside it is present, otherwise the cell is missing.

use super::{columns, Column, Dataset};
use crate::error::Result;
use tracing::debug;

pub const SHORT_MA_WINDOW: usize = 20;
pub const LONG_MA_WINDOW: usize = 50;
pub const VOLATILITY_WINDOW: usize = 20;

/// Close-to-close fractional change; the first row is missing
pub fn daily_returns(close: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(close.len());
    if close.is_empty() {
        return returns;
    }
    returns.push(None);
    for pair in close.windows(2) {
        let change = match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) if prev != 0.0 => Some(curr / prev - 1.0),
            _ => None,
        };
        returns.push(change);
    }
    returns
}

/// Simple moving average over a full window
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Sample standard deviation (n - 1 denominator) over a full window
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        if w.len() < 2 {
            return f64::NAN;
        }
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let variance = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (w.len() - 1) as f64;
        variance.sqrt()
    })
}

fn rolling<F>(values: &[Option<f64>], window: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut buffer = Vec::with_capacity(window);
    for (end, slot) in out.iter_mut().enumerate().skip(window - 1) {
        buffer.clear();
        buffer.extend(values[end + 1 - window..=end].iter().flatten().copied());
        if buffer.len() == window {
            let value = reduce(&buffer);
            if value.is_finite() {
                *slot = Some(value);
            }
        }
    }
    out
}

impl Dataset {
    /// Add `Daily_Return`, `MA_20`, `MA_50` and `Volatility_20d` when absent
    pub fn with_indicators(mut self) -> Result<Self> {
        let close = self.numeric(columns::CLOSE)?.to_vec();

        if !self.has_column(columns::DAILY_RETURN) {
            self.insert_column(columns::DAILY_RETURN, Column::Numeric(daily_returns(&close)))?;
        }
        if !self.has_column(columns::MA_20) {
            self.insert_column(columns::MA_20, Column::Numeric(rolling_mean(&close, SHORT_MA_WINDOW)))?;
        }
        if !self.has_column(columns::MA_50) {
            self.insert_column(columns::MA_50, Column::Numeric(rolling_mean(&close, LONG_MA_WINDOW)))?;
        }
        if !self.has_column(columns::VOLATILITY_20D) {
            let returns = self.numeric(columns::DAILY_RETURN)?.to_vec();
            self.insert_column(
                columns::VOLATILITY_20D,
                Column::Numeric(rolling_std(&returns, VOLATILITY_WINDOW)),
            )?;
        }

        debug!("Derived indicators for {} rows", self.len());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_daily_returns() {
        let returns = daily_returns(&[Some(100.0), Some(110.0), None, Some(99.0)]);
        assert_eq!(returns.len(), 4);
        assert_eq!(returns[0], None);
        assert!(approx(returns[1].unwrap(), 0.1));
        assert_eq!(returns[2], None);
        assert_eq!(returns[3], None);
    }

    #[test]
    fn test_rolling_mean_waits_for_full_window() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0].into_iter().map(Some).collect();
        let ma = rolling_mean(&values, 3);
        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert!(approx(ma[2].unwrap(), 2.0));
        assert!(approx(ma[3].unwrap(), 3.0));
    }

    #[test]
    fn test_rolling_window_with_gap_is_missing() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let ma = rolling_mean(&values, 2);
        assert_eq!(ma, vec![None, None, None, Some(3.5)]);
    }

    #[test]
    fn test_rolling_std_is_sample_std() {
        let values: Vec<Option<f64>> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .into_iter()
            .map(Some)
            .collect();
        let std = rolling_std(&values, 8);
        // population std is 2.0, sample std is sqrt(32 / 7)
        assert!(approx(std[7].unwrap(), (32.0f64 / 7.0).sqrt()));
    }

    #[test]
    fn test_with_indicators_adds_missing_columns_only() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let dataset = Dataset::new()
            .with_column(columns::CLOSE, Column::from_values(closes))
            .unwrap()
            .with_column(columns::MA_20, Column::from_values(vec![1.0; 60]))
            .unwrap()
            .with_indicators()
            .unwrap();

        // existing MA_20 kept as provided
        assert_eq!(dataset.numeric(columns::MA_20).unwrap()[59], Some(1.0));

        let ma50 = dataset.numeric(columns::MA_50).unwrap();
        assert_eq!(ma50[48], None);
        assert!(approx(ma50[49].unwrap(), 124.5));

        let vol = dataset.numeric(columns::VOLATILITY_20D).unwrap();
        assert_eq!(vol[19], None);
        assert!(vol[20].is_some());
    }
}
