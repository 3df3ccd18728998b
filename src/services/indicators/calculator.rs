// File: src/services/indicators/calculator.rs
use super::backend::{IndicatorBackend, MacdSeries};
use super::smoothing::{ewm_mean, rolling_mean, span_alpha};
use crate::error::{AppError, Result};
use crate::storage::models::ohlcv::{IndicatorTable, NumericColumn, OhlcvTable};
use std::sync::Arc;
use tracing::{debug, warn};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

pub struct IndicatorCalculator {
    backend: Arc<dyn IndicatorBackend>,
    ma_windows: Vec<usize>,
}

impl IndicatorCalculator {
    pub fn new(backend: Arc<dyn IndicatorBackend>, ma_windows: Vec<usize>) -> Self {
        Self {
            backend,
            ma_windows,
        }
    }

    /// Добавляет к таблице SMA/EMA по каждому окну, RSI(14) и MACD(12, 26, 9).
    /// Сбой расчета RSI или MACD не прерывает обработку: колонки заполняются NaN.
    pub fn calculate(&self, table: &OhlcvTable, close_column: &str) -> Result<IndicatorTable> {
        let close = table.column(close_column).ok_or_else(|| {
            AppError::NotFound(format!("Price column not found: {}", close_column))
        })?;
        let len = close.len();

        let mut derived = Vec::with_capacity(self.ma_windows.len() * 2 + 4);

        // Скользящие средние
        for &window in &self.ma_windows {
            derived.push(NumericColumn::new(
                format!("sma_{}", window),
                rolling_mean(close, window),
            ));
            derived.push(NumericColumn::new(
                format!("ema_{}", window),
                ewm_mean(close, span_alpha(window), 1),
            ));
        }

        // RSI
        let rsi = match self.backend.rsi(close, RSI_PERIOD) {
            Ok(values) if values.len() == len => values,
            Ok(values) => {
                warn!(
                    "Backend {} returned {} RSI values for {} rows, using NaN",
                    self.backend.name(),
                    values.len(),
                    len
                );
                vec![f64::NAN; len]
            }
            Err(e) => {
                warn!("RSI calculation failed ({}), using NaN", e);
                vec![f64::NAN; len]
            }
        };
        derived.push(NumericColumn::new(format!("rsi_{}", RSI_PERIOD), rsi));

        // MACD
        let macd = match self.backend.macd(close, MACD_FAST, MACD_SLOW, MACD_SIGNAL) {
            Ok(series)
                if series.macd.len() == len
                    && series.signal.len() == len
                    && series.hist.len() == len =>
            {
                series
            }
            Ok(_) => {
                warn!(
                    "Backend {} returned misaligned MACD series, using NaN",
                    self.backend.name()
                );
                MacdSeries::nan(len)
            }
            Err(e) => {
                warn!("MACD calculation failed ({}), using NaN", e);
                MacdSeries::nan(len)
            }
        };
        derived.push(NumericColumn::new("macd", macd.macd));
        derived.push(NumericColumn::new("macd_signal", macd.signal));
        derived.push(NumericColumn::new("macd_hist", macd.hist));

        debug!(
            "Calculated {} indicator columns for {} rows with backend {}",
            derived.len(),
            len,
            self.backend.name()
        );

        Ok(IndicatorTable {
            ohlcv: table.clone(),
            derived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::backend::UnavailableBackend;
    use crate::utils::dates::parse_datetime;

    struct FailingBackend;

    impl IndicatorBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn rsi(&self, _close: &[f64], _period: usize) -> Result<Vec<f64>> {
            Err(AppError::Validation("boom".to_string()))
        }

        fn macd(&self, _close: &[f64], _f: usize, _s: usize, _sig: usize) -> Result<MacdSeries> {
            Err(AppError::Validation("boom".to_string()))
        }
    }

    fn table(closes: &[f64]) -> OhlcvTable {
        let n = closes.len();
        OhlcvTable {
            dates: (0..n)
                .map(|i| parse_datetime(&format!("2020-01-{:02}", i + 1)))
                .collect(),
            open: closes.to_vec(),
            high: closes.to_vec(),
            low: closes.to_vec(),
            close: closes.to_vec(),
            volume: vec![1000.0; n],
            passthrough: Vec::new(),
        }
    }

    fn column_names(result: &IndicatorTable) -> Vec<&str> {
        result.derived.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_default_columns() {
        let calc = IndicatorCalculator::new(Arc::new(UnavailableBackend), vec![7, 21, 50]);
        let result = calc.calculate(&table(&[1.0, 2.0, 3.0]), "Close").unwrap();

        assert_eq!(
            column_names(&result),
            vec![
                "sma_7",
                "ema_7",
                "sma_21",
                "ema_21",
                "sma_50",
                "ema_50",
                "rsi_14",
                "macd",
                "macd_signal",
                "macd_hist"
            ]
        );
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_sma_min_periods_one() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
        let calc = IndicatorCalculator::new(Arc::new(UnavailableBackend), vec![7]);
        let result = calc.calculate(&table(&closes), "Close").unwrap();

        let sma = result.column("sma_7").unwrap();
        assert_eq!(sma[0], 10.0);
        assert_eq!(sma[1], 10.5);
        assert!((sma[6] - 13.0).abs() < 1e-12);
        assert!((sma[7] - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_ema_seeded_with_first_close() {
        let calc = IndicatorCalculator::new(Arc::new(UnavailableBackend), vec![3]);
        let result = calc.calculate(&table(&[10.0, 12.0, 14.0]), "Close").unwrap();

        // span 3 => alpha 0.5
        assert_eq!(result.column("ema_3").unwrap(), &[10.0, 11.0, 12.5][..]);
    }

    #[test]
    fn test_backend_failure_downgrades_to_nan() {
        let calc = IndicatorCalculator::new(Arc::new(FailingBackend), vec![2]);
        let result = calc.calculate(&table(&[1.0, 2.0, 3.0]), "Close").unwrap();

        for name in ["rsi_14", "macd", "macd_signal", "macd_hist"] {
            assert!(result.column(name).unwrap().iter().all(|v| v.is_nan()));
        }
        assert_eq!(result.column("sma_2").unwrap(), &[1.0, 1.5, 2.5][..]);
    }

    #[test]
    fn test_unknown_price_column() {
        let calc = IndicatorCalculator::new(Arc::new(UnavailableBackend), vec![7]);
        let err = calc.calculate(&table(&[1.0]), "Adj Close").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[cfg(feature = "wilder")]
    #[test]
    fn test_wilder_backend_fills_indicators() {
        use crate::services::indicators::backend::WilderBackend;

        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let calc = IndicatorCalculator::new(Arc::new(WilderBackend), vec![7]);
        let result = calc.calculate(&table(&closes), "Close").unwrap();

        assert!(result.column("rsi_14").unwrap()[14].is_finite());
        assert!(result.column("macd_hist").unwrap()[33].is_finite());
        assert!(result.column("macd_hist").unwrap()[32].is_nan());
    }
}
