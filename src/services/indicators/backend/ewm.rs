// File: src/services/indicators/backend/ewm.rs
use super::{IndicatorBackend, MacdSeries, validate_macd_params, validate_rsi_params};
use crate::error::Result;
use crate::services::indicators::smoothing::{ewm_mean, span_alpha};

/// Формулы на экспоненциальных средних без затравки простым средним
/// (совместимы с Python-библиотекой `ta`).
pub struct EwmBackend;

impl IndicatorBackend for EwmBackend {
    fn name(&self) -> &'static str {
        "ewm"
    }

    fn rsi(&self, close: &[f64], period: usize) -> Result<Vec<f64>> {
        validate_rsi_params(period)?;

        // Первое изменение не определено и считается нулевым
        let mut up = Vec::with_capacity(close.len());
        let mut down = Vec::with_capacity(close.len());
        for i in 0..close.len() {
            let change = if i == 0 { f64::NAN } else { close[i] - close[i - 1] };
            up.push(if change > 0.0 { change } else { 0.0 });
            down.push(if change < 0.0 { -change } else { 0.0 });
        }

        let alpha = 1.0 / period as f64;
        let avg_up = ewm_mean(&up, alpha, period);
        let avg_down = ewm_mean(&down, alpha, period);

        Ok(avg_up
            .iter()
            .zip(avg_down.iter())
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    100.0
                } else {
                    100.0 - 100.0 / (1.0 + gain / loss)
                }
            })
            .collect())
    }

    fn macd(&self, close: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdSeries> {
        validate_macd_params(fast, slow, signal)?;

        let ema_fast = ewm_mean(close, span_alpha(fast), fast);
        let ema_slow = ewm_mean(close, span_alpha(slow), slow);
        let macd: Vec<f64> = ema_fast
            .iter()
            .zip(ema_slow.iter())
            .map(|(f, s)| f - s)
            .collect();
        let signal_line = ewm_mean(&macd, span_alpha(signal), signal);
        let hist = macd
            .iter()
            .zip(signal_line.iter())
            .map(|(m, s)| m - s)
            .collect();

        Ok(MacdSeries {
            macd,
            signal: signal_line,
            hist,
        })
    }
}
