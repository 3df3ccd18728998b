// File: src/services/indicators/backend/mod.rs
#[cfg(feature = "ewm")]
mod ewm;
#[cfg(feature = "wilder")]
mod wilder;

#[cfg(feature = "ewm")]
pub use ewm::EwmBackend;
#[cfg(feature = "wilder")]
pub use wilder::WilderBackend;

use crate::env_config::models::app_config::IndicatorBackendKind;
use crate::error::{AppError, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Линия MACD, сигнальная линия и гистограмма
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

impl MacdSeries {
    pub fn nan(len: usize) -> Self {
        Self {
            macd: vec![f64::NAN; len],
            signal: vec![f64::NAN; len],
            hist: vec![f64::NAN; len],
        }
    }
}

/// Поставщик формул RSI и MACD
pub trait IndicatorBackend {
    fn name(&self) -> &'static str;

    fn rsi(&self, close: &[f64], period: usize) -> Result<Vec<f64>>;

    fn macd(&self, close: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdSeries>;
}

/// Заглушка на случай, когда ни один поставщик не собран: всё NaN
pub struct UnavailableBackend;

impl IndicatorBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn rsi(&self, close: &[f64], _period: usize) -> Result<Vec<f64>> {
        Ok(vec![f64::NAN; close.len()])
    }

    fn macd(&self, close: &[f64], _fast: usize, _slow: usize, _signal: usize) -> Result<MacdSeries> {
        Ok(MacdSeries::nan(close.len()))
    }
}

pub(crate) fn validate_rsi_params(period: usize) -> Result<()> {
    if period == 0 {
        return Err(AppError::Validation("RSI period must be positive".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_macd_params(fast: usize, slow: usize, signal: usize) -> Result<()> {
    if fast == 0 || slow == 0 || signal == 0 {
        return Err(AppError::Validation("MACD periods must be positive".to_string()));
    }
    if fast >= slow {
        return Err(AppError::Validation(format!(
            "MACD fast period ({}) must be shorter than slow period ({})",
            fast, slow
        )));
    }
    Ok(())
}

#[cfg(feature = "wilder")]
fn wilder_backend() -> Option<Arc<dyn IndicatorBackend>> {
    Some(Arc::new(WilderBackend))
}

#[cfg(not(feature = "wilder"))]
fn wilder_backend() -> Option<Arc<dyn IndicatorBackend>> {
    None
}

#[cfg(feature = "ewm")]
fn ewm_backend() -> Option<Arc<dyn IndicatorBackend>> {
    Some(Arc::new(EwmBackend))
}

#[cfg(not(feature = "ewm"))]
fn ewm_backend() -> Option<Arc<dyn IndicatorBackend>> {
    None
}

/// Выбирает первый доступный поставщик из списка в порядке приоритета
pub fn detect_backend(preferred: &[IndicatorBackendKind]) -> Arc<dyn IndicatorBackend> {
    for kind in preferred {
        let backend = match kind {
            IndicatorBackendKind::Wilder => wilder_backend(),
            IndicatorBackendKind::Ewm => ewm_backend(),
        };
        match backend {
            Some(backend) => {
                info!("Using indicator backend: {}", backend.name());
                return backend;
            }
            None => warn!("Indicator backend {:?} is not compiled in, skipping", kind),
        }
    }

    warn!("No indicator backend available, RSI/MACD columns will be NaN");
    Arc::new(UnavailableBackend)
}
