// File: src/services/correlation/aggregator.rs
use crate::utils::numbers::finite;
use chrono::NaiveDate;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Совмещение дневной доходности и настроения по общим датам
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub overlap_days: usize,
    pub pearson_corr: Option<f64>,
}

/// Коэффициент корреляции Пирсона.
/// `None`, если точек меньше двух или дисперсия нулевая.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let covariance = x.iter().covariance(y.iter());
    let corr = covariance / (x.iter().std_dev() * y.iter().std_dev());
    finite(corr).map(|r| r.clamp(-1.0, 1.0))
}

pub fn correlate(
    returns: &BTreeMap<NaiveDate, f64>,
    sentiment: &BTreeMap<NaiveDate, f64>,
) -> Alignment {
    let (x, y): (Vec<f64>, Vec<f64>) = returns
        .iter()
        .filter_map(|(date, ret)| sentiment.get(date).map(|score| (*ret, *score)))
        .unzip();

    let overlap_days = x.len();
    let pearson_corr = if overlap_days < 2 {
        None
    } else {
        pearson(&x, &y)
    };

    Alignment {
        overlap_days,
        pearson_corr,
    }
}
