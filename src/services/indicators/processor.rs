// File: src/services/indicators/processor.rs
use super::calculator::IndicatorCalculator;
use super::metrics::{annual_volatility, sharpe_ratio};
use crate::app_state::models::AppState;
use crate::error::Result;
use crate::services::market_data::standardizer::standardize;
use crate::storage::models::summary::{IndicatorSummary, ReportEntry};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const INDICATORS_SUFFIX: &str = "_indicators.csv";

pub struct IndicatorsProcessor {
    app_state: Arc<AppState>,
}

impl IndicatorsProcessor {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// Рассчитывает индикаторы для всех CSV из каталога котировок.
    /// Ошибка по одному файлу попадает в сводку и не прерывает обработку.
    pub fn trigger_update(&self) -> Result<BTreeMap<String, ReportEntry<IndicatorSummary>>> {
        let paths = &self.app_state.settings.app_config.paths;
        let storage = &self.app_state.storage_service;

        info!("Starting indicators update from {}", paths.stock_dir.display());

        let mut summaries = BTreeMap::new();
        let files = storage
            .repository_table
            .list_files(&paths.stock_dir, ".csv")?;

        if files.is_empty() {
            warn!("No CSV files found in {}", paths.stock_dir.display());
            return Ok(summaries);
        }

        info!("Found {} files for processing", files.len());

        storage
            .repository_report
            .ensure_dir(&paths.indicators_out_dir)?;

        let calculator = IndicatorCalculator::new(
            self.app_state.indicator_backend.clone(),
            self.app_state.settings.app_config.indicators.ma_windows.clone(),
        );

        for (index, path) in files.iter().enumerate() {
            let name = file_name(path);
            info!("Processing file {}/{}: {}", index + 1, files.len(), name);

            let entry = match self.process_file(&calculator, path, &name) {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Error processing indicators for {}: {}", name, e);
                    ReportEntry::failed(e.to_string())
                }
            };
            summaries.insert(name, entry);
        }

        let all_path = paths.indicators_out_dir.join("all_summaries.json");
        storage
            .repository_report
            .write_json(&all_path, &serde_json::to_value(&summaries)?)?;

        let succeeded = summaries.values().filter(|e| e.is_ok()).count();
        info!(
            "Completed indicators update: {} of {} files processed",
            succeeded,
            summaries.len()
        );

        Ok(summaries)
    }

    fn process_file(
        &self,
        calculator: &IndicatorCalculator,
        path: &Path,
        name: &str,
    ) -> Result<ReportEntry<IndicatorSummary>> {
        let storage = &self.app_state.storage_service;
        let out_dir = &self.app_state.settings.app_config.paths.indicators_out_dir;

        let raw = storage.repository_table.read_table(path)?;
        let table = standardize(&raw).without_missing_close();
        if table.is_empty() {
            warn!("No valid rows in {} after standardization", name);
            return Ok(ReportEntry::failed("no valid rows after standardization"));
        }

        let indicators = calculator.calculate(&table, "Close")?;

        let summary = IndicatorSummary {
            file: name.to_string(),
            rows: indicators.len(),
            sharpe: sharpe_ratio(&table.close),
            annual_vol: annual_volatility(&table.close),
        };

        let stem = file_stem(path);
        let csv_path = out_dir.join(format!("{}{}", stem, INDICATORS_SUFFIX));
        storage
            .repository_indicator
            .write_indicators(&csv_path, &indicators)?;
        storage.repository_report.write_json(
            &out_dir.join(format!("{}_summary.json", stem)),
            &serde_json::to_value(&summary)?,
        )?;

        debug!("Summary for {}: {:?}", name, summary);
        info!("Wrote {}", csv_path.display());

        Ok(ReportEntry::Ok(summary))
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_support::state_for;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    fn write_prices(dir: &Path, name: &str, rows: usize) {
        let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
        for i in 0..rows {
            let close = 100.0 + (i as f64 * 0.4).sin() * 3.0 + i as f64 * 0.2;
            content.push_str(&format!(
                "2021-{:02}-{:02},{},{},{},{},{},{}\n",
                1 + i / 28,
                1 + i % 28,
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                close * 0.98,
                1000 + i
            ));
        }
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_trigger_update_writes_outputs() {
        let root = tempdir().unwrap();
        let stocks = root.path().join("stocks");
        fs::create_dir_all(&stocks).unwrap();
        write_prices(&stocks, "AAPL.csv", 60);

        let state = state_for(root.path(), "");
        let summaries = IndicatorsProcessor::new(state.clone()).trigger_update().unwrap();

        let entry = &summaries["AAPL.csv"];
        match entry {
            ReportEntry::Ok(summary) => {
                assert_eq!(summary.rows, 60);
                assert!(summary.sharpe.is_some());
                assert!(summary.annual_vol.is_some());
            }
            ReportEntry::Failed { error } => panic!("unexpected error: {}", error),
        }

        let out = root.path().join("out/indicators");
        assert!(out.join("AAPL_indicators.csv").exists());
        let summary: Value =
            serde_json::from_str(&fs::read_to_string(out.join("AAPL_summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["file"], "AAPL.csv");
        assert_eq!(summary["rows"], 60);

        let all: Value =
            serde_json::from_str(&fs::read_to_string(out.join("all_summaries.json")).unwrap())
                .unwrap();
        assert_eq!(all["AAPL.csv"]["rows"], 60);

        let loaded = state
            .storage_service
            .repository_indicator
            .read_indicators(&out.join("AAPL_indicators.csv"))
            .unwrap();
        assert!(loaded.column("sma_50").is_some());
        assert!(loaded.column("macd_hist").is_some());
        assert_eq!(loaded.ohlcv.passthrough[0].name, "Adj Close");
    }

    #[test]
    fn test_bad_files_are_recorded_and_skipped() {
        let root = tempdir().unwrap();
        let stocks = root.path().join("stocks");
        fs::create_dir_all(&stocks).unwrap();
        write_prices(&stocks, "GOOD.csv", 10);
        fs::write(stocks.join("EMPTY.csv"), "Date,Close\n2020-01-01,\n2020-01-02,n/a\n").unwrap();
        fs::write(stocks.join("RAGGED.csv"), "Date,Close\n2020-01-01,1,2\n").unwrap();

        let summaries = IndicatorsProcessor::new(state_for(root.path(), ""))
            .trigger_update()
            .unwrap();

        assert_eq!(summaries.len(), 3);
        assert!(summaries["GOOD.csv"].is_ok());
        assert_eq!(
            summaries["EMPTY.csv"],
            ReportEntry::failed("no valid rows after standardization")
        );
        assert!(!summaries["RAGGED.csv"].is_ok());
    }

    #[test]
    fn test_missing_stock_dir_yields_empty_summary() {
        let root = tempdir().unwrap();
        let summaries = IndicatorsProcessor::new(state_for(root.path(), ""))
            .trigger_update()
            .unwrap();
        assert!(summaries.is_empty());
    }
}
