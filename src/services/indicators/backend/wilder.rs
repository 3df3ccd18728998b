// File: src/services/indicators/backend/wilder.rs
use super::{IndicatorBackend, MacdSeries, validate_macd_params, validate_rsi_params};
use crate::error::Result;

/// Классические формулы (совместимые с TA-Lib): средние засеваются простым средним,
/// RSI сглаживается по Уайлдеру.
pub struct WilderBackend;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        0.0
    } else {
        100.0 * avg_gain / total
    }
}

impl IndicatorBackend for WilderBackend {
    fn name(&self) -> &'static str {
        "wilder"
    }

    fn rsi(&self, close: &[f64], period: usize) -> Result<Vec<f64>> {
        validate_rsi_params(period)?;

        let mut out = vec![f64::NAN; close.len()];
        if close.len() <= period {
            return Ok(out);
        }

        let p = period as f64;
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;

        // Первые period изменений дают начальные средние
        for i in 1..=period {
            let change = close[i] - close[i - 1];
            if change > 0.0 {
                avg_gain += change;
            } else {
                avg_loss -= change;
            }
        }
        avg_gain /= p;
        avg_loss /= p;
        out[period] = rsi_value(avg_gain, avg_loss);

        for i in (period + 1)..close.len() {
            let change = close[i] - close[i - 1];
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);
            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
            out[i] = rsi_value(avg_gain, avg_loss);
        }

        Ok(out)
    }

    fn macd(&self, close: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdSeries> {
        validate_macd_params(fast, slow, signal)?;

        let n = close.len();
        let line_start = slow - 1;
        let first_output = line_start + signal - 1;
        let mut out = MacdSeries::nan(n);
        if n <= first_output {
            return Ok(out);
        }

        let k_fast = 2.0 / (fast as f64 + 1.0);
        let k_slow = 2.0 / (slow as f64 + 1.0);
        let k_signal = 2.0 / (signal as f64 + 1.0);

        // Обе средние засеваются так, чтобы первое значение линии пришлось на slow - 1
        let mut ema_slow = mean(&close[..slow]);
        let mut ema_fast = mean(&close[slow - fast..slow]);

        let mut line = vec![f64::NAN; n];
        line[line_start] = ema_fast - ema_slow;
        for i in slow..n {
            ema_fast += k_fast * (close[i] - ema_fast);
            ema_slow += k_slow * (close[i] - ema_slow);
            line[i] = ema_fast - ema_slow;
        }

        let mut ema_signal = mean(&line[line_start..=first_output]);
        for i in first_output..n {
            if i > first_output {
                ema_signal += k_signal * (line[i] - ema_signal);
            }
            out.macd[i] = line[i];
            out.signal[i] = ema_signal;
            out.hist[i] = line[i] - ema_signal;
        }

        Ok(out)
    }
}
