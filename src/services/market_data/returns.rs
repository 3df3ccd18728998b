// File: src/services/market_data/returns.rs
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Относительное изменение к предыдущему значению, первый элемент NaN
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = (values[i] - values[i - 1]) / values[i - 1];
    }
    out
}

/// Дневная доходность по цене закрытия, индексированная датой без времени.
/// Неопределенные значения и строки без даты отбрасываются.
pub fn daily_returns(dates: &[Option<NaiveDateTime>], close: &[f64]) -> BTreeMap<NaiveDate, f64> {
    pct_change(close)
        .into_iter()
        .zip(dates.iter())
        .filter(|(ret, _)| !ret.is_nan())
        .filter_map(|(ret, date)| date.map(|dt| (dt.date(), ret)))
        .collect()
}
