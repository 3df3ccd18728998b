// File: src/services/correlation/processor.rs
use super::aggregator::correlate;
use crate::app_state::models::AppState;
use crate::error::{AppError, Result};
use crate::services::indicators::processor::{INDICATORS_SUFFIX, file_stem};
use crate::services::market_data::returns::daily_returns;
use crate::services::sentiment::scorer::{
    SentimentScorer, aggregate_by_date, find_date_column, find_text_column,
};
use crate::storage::models::summary::{CorrelationRow, CorrelationSummary, ReportEntry};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Итог этапа корреляции
#[derive(Debug, Clone, PartialEq)]
pub enum CorrelationOutcome {
    /// Этап пропущен целиком, причина в тексте
    Skipped(String),
    Completed(BTreeMap<String, ReportEntry<CorrelationSummary>>),
}

pub struct CorrelationProcessor {
    app_state: Arc<AppState>,
}

impl CorrelationProcessor {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// Считает настроение новостей по дням и коррелирует его с доходностью
    /// каждого тикера, для которого есть файл индикаторов.
    pub fn trigger_update(&self) -> Result<CorrelationOutcome> {
        let paths = &self.app_state.settings.app_config.paths;
        let storage = &self.app_state.storage_service;

        info!("Starting sentiment correlation from {}", paths.news_file.display());

        if !paths.news_file.is_file() {
            return Ok(skip(format!(
                "news CSV not found at {}",
                paths.news_file.display()
            )));
        }

        let news = storage.repository_table.read_table(&paths.news_file)?;
        if news.is_empty() {
            warn!("News CSV {} has no records", paths.news_file.display());
        }

        let Some(text_column) = find_text_column(&news) else {
            return Ok(skip(
                "no text column; expected one of headline/title/text/content",
            ));
        };
        let Some(date_column) = find_date_column(&news) else {
            return Ok(skip("no date column detected in news CSV"));
        };

        debug!(
            "Using text column '{}' and date column '{}'",
            text_column, date_column
        );

        let scorer = SentimentScorer::new(self.app_state.polarity_model.clone());
        let records = scorer.compute_sentiment(&news, &text_column, &date_column)?;
        let daily_sentiment = aggregate_by_date(&records);
        info!(
            "Scored {} news records over {} days",
            records.len(),
            daily_sentiment.len()
        );

        let files = storage
            .repository_table
            .list_files(&paths.indicators_out_dir, INDICATORS_SUFFIX)?;
        if files.is_empty() {
            return Ok(skip(format!(
                "no processed stock indicator CSVs found in {}",
                paths.indicators_out_dir.display()
            )));
        }

        storage
            .repository_report
            .ensure_dir(&paths.correlation_out_dir)?;

        let mut summaries = BTreeMap::new();
        let mut rows = Vec::new();

        for path in &files {
            match self.process_ticker(path, &daily_sentiment) {
                Ok(summary) => {
                    rows.push(CorrelationRow::from(&summary));
                    summaries.insert(summary.ticker.clone(), ReportEntry::Ok(summary));
                }
                Err(e) => {
                    let stem = file_stem(path);
                    error!("Error correlating {}: {}", stem, e);
                    summaries.insert(stem, ReportEntry::failed(e.to_string()));
                }
            }
        }

        storage
            .repository_report
            .write_correlations(&paths.correlation_out_dir.join("correlations.csv"), &rows)?;
        storage.repository_report.write_json(
            &paths.correlation_out_dir.join("all_sentiment_summaries.json"),
            &serde_json::to_value(&summaries)?,
        )?;

        info!(
            "Completed sentiment correlation: {} of {} tickers correlated",
            rows.len(),
            files.len()
        );

        Ok(CorrelationOutcome::Completed(summaries))
    }

    fn process_ticker(
        &self,
        path: &Path,
        daily_sentiment: &BTreeMap<NaiveDate, f64>,
    ) -> Result<CorrelationSummary> {
        let storage = &self.app_state.storage_service;
        let out_dir = &self.app_state.settings.app_config.paths.correlation_out_dir;

        let stem = file_stem(path);
        let ticker = stem.strip_suffix("_indicators").unwrap_or(&stem).to_string();

        let table = storage.repository_indicator.read_indicators(path)?;
        let close = table
            .column("Close")
            .ok_or_else(|| AppError::NotFound(format!("Close column in {}", path.display())))?;
        let returns = daily_returns(&table.ohlcv.dates, close);
        let alignment = correlate(&returns, daily_sentiment);

        let summary = CorrelationSummary {
            ticker,
            rows_stock: table.len(),
            rows_sentiment_days: daily_sentiment.len(),
            overlap_days: alignment.overlap_days,
            pearson_corr: alignment.pearson_corr,
        };

        storage.repository_report.write_json(
            &out_dir.join(format!("{}_sentiment_summary.json", summary.ticker)),
            &serde_json::to_value(&summary)?,
        )?;

        debug!("Correlation summary: {:?}", summary);
        Ok(summary)
    }
}

fn skip(reason: impl Into<String>) -> CorrelationOutcome {
    let reason = reason.into();
    warn!("Skipping sentiment correlation: {}", reason);
    CorrelationOutcome::Skipped(reason)
}
