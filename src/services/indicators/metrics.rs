// File: src/services/indicators/metrics.rs
use crate::services::market_data::returns::pct_change;
use crate::utils::numbers::finite;
use statrs::statistics::Statistics;

pub const TRADING_DAYS: f64 = 252.0;

/// Годовой коэффициент Шарпа при нулевой безрисковой ставке.
/// Первая доходность считается нулевой, бесконечные значения отбрасываются.
pub fn sharpe_ratio(close: &[f64]) -> Option<f64> {
    let returns: Vec<f64> = pct_change(close)
        .into_iter()
        .map(|r| if r.is_nan() { 0.0 } else { r })
        .filter(|r| r.is_finite())
        .collect();

    if returns.is_empty() {
        return None;
    }

    let mean = returns.iter().mean();
    let std = returns.iter().std_dev();
    finite(mean / std * TRADING_DAYS.sqrt())
}

/// Годовая волатильность дневной доходности
pub fn annual_volatility(close: &[f64]) -> Option<f64> {
    let returns: Vec<f64> = pct_change(close)
        .into_iter()
        .filter(|r| !r.is_nan())
        .collect();

    if returns.is_empty() {
        return None;
    }

    finite(returns.iter().std_dev() * TRADING_DAYS.sqrt())
}
