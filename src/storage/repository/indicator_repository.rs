// File: src/storage/repository/indicator_repository.rs
use super::table_repository::read_raw_csv;
use crate::error::{AppError, Result};
use crate::storage::models::ohlcv::{
    IndicatorTable, NumericColumn, OHLCV_COLUMNS, OhlcvTable, TextColumn,
};
use crate::utils::dates::{format_date_index, parse_datetime};
use crate::utils::numbers::{format_f64, parse_f64};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DATE_COLUMN: &str = "Date";

pub trait TraitIndicatorRepository {
    /// Записывает таблицу индикаторов: Date, OHLCV, прочие колонки, индикаторы
    fn write_indicators(&self, path: &Path, table: &IndicatorTable) -> Result<()>;

    /// Читает ранее записанную таблицу индикаторов; колонки Date и Close обязательны
    fn read_indicators(&self, path: &Path) -> Result<IndicatorTable>;
}

pub struct StructCsvIndicatorRepository;

impl StructCsvIndicatorRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StructCsvIndicatorRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn is_derived_column(name: &str) -> bool {
    name.starts_with("sma_")
        || name.starts_with("ema_")
        || name.starts_with("rsi_")
        || name.starts_with("macd")
}

impl TraitIndicatorRepository for StructCsvIndicatorRepository {
    fn write_indicators(&self, path: &Path, table: &IndicatorTable) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let ohlcv = &table.ohlcv;
        let mut writer = csv::Writer::from_path(path)?;

        let mut header: Vec<&str> = vec![DATE_COLUMN];
        header.extend(OHLCV_COLUMNS);
        header.extend(ohlcv.passthrough.iter().map(|c| c.name.as_str()));
        header.extend(table.derived.iter().map(|c| c.name.as_str()));
        writer.write_record(&header)?;

        let dates = format_date_index(&ohlcv.dates);
        for (i, date) in dates.into_iter().enumerate() {
            let mut record = Vec::with_capacity(header.len());
            record.push(date);
            for values in [&ohlcv.open, &ohlcv.high, &ohlcv.low, &ohlcv.close, &ohlcv.volume] {
                record.push(format_f64(values[i]));
            }
            record.extend(ohlcv.passthrough.iter().map(|c| c.values[i].clone()));
            record.extend(table.derived.iter().map(|c| format_f64(c.values[i])));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        debug!("Wrote {} indicator rows to {}", table.len(), path.display());
        Ok(())
    }

    fn read_indicators(&self, path: &Path) -> Result<IndicatorTable> {
        let raw = read_raw_csv(path)?;

        let date_idx = raw.column_index(DATE_COLUMN).ok_or_else(|| {
            AppError::Validation(format!(
                "Missing column '{}' in {}",
                DATE_COLUMN,
                path.display()
            ))
        })?;
        if !raw.has_column("Close") {
            return Err(AppError::Validation(format!(
                "Missing column 'Close' in {}",
                path.display()
            )));
        }

        let numeric = |name: &str| -> Vec<f64> {
            match raw.column_index(name) {
                Some(idx) => raw.column_values(idx).map(parse_f64).collect(),
                None => vec![f64::NAN; raw.len()],
            }
        };

        let mut passthrough = Vec::new();
        let mut derived = Vec::new();
        for (idx, name) in raw.headers.iter().enumerate() {
            if idx == date_idx || OHLCV_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            if is_derived_column(name) {
                derived.push(NumericColumn::new(
                    name.clone(),
                    raw.column_values(idx).map(parse_f64).collect(),
                ));
            } else {
                passthrough.push(TextColumn {
                    name: name.clone(),
                    values: raw.column_values(idx).map(String::from).collect(),
                });
            }
        }

        let ohlcv = OhlcvTable {
            dates: raw.column_values(date_idx).map(parse_datetime).collect(),
            open: numeric("Open"),
            high: numeric("High"),
            low: numeric("Low"),
            close: numeric("Close"),
            volume: numeric("Volume"),
            passthrough,
        };

        Ok(IndicatorTable { ohlcv, derived })
    }
}
