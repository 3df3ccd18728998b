// File: src/services/sentiment/scorer.rs
use super::polarity::PolarityModel;
use crate::error::{AppError, Result};
use crate::storage::models::table::RawTable;
use crate::utils::dates::{parse_date, parse_datetime};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const TEXT_COLUMNS: &[&str] = &["headline", "title", "text", "content"];
const DATE_COLUMNS: &[&str] = &["date", "published", "timestamp"];

/// Оценка одной новости
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub date: Option<NaiveDate>,
    pub sentiment: f64,
}

/// Колонка с текстом: сначала точное совпадение, затем без учета регистра
pub fn find_text_column(table: &RawTable) -> Option<String> {
    if let Some(name) = TEXT_COLUMNS.iter().find(|name| table.has_column(name)) {
        return Some(name.to_string());
    }

    TEXT_COLUMNS.iter().find_map(|name| {
        table
            .headers
            .iter()
            .find(|header| header.eq_ignore_ascii_case(name))
            .cloned()
    })
}

/// Колонка с датой: известные имена, иначе первая колонка,
/// чье первое непустое значение разбирается как дата
pub fn find_date_column(table: &RawTable) -> Option<String> {
    if let Some(name) = DATE_COLUMNS.iter().find(|name| table.has_column(name)) {
        return Some(name.to_string());
    }

    table
        .headers
        .iter()
        .enumerate()
        .find(|(index, _)| {
            table
                .column_values(*index)
                .find(|value| !value.trim().is_empty())
                .and_then(parse_datetime)
                .is_some()
        })
        .map(|(_, header)| header.clone())
}

pub struct SentimentScorer {
    model: Arc<dyn PolarityModel>,
}

impl SentimentScorer {
    pub fn new(model: Arc<dyn PolarityModel>) -> Self {
        Self { model }
    }

    /// Оценивает каждую запись независимо.
    /// Нераспознанная дата дает `None`, запись остается в результате.
    pub fn compute_sentiment(
        &self,
        table: &RawTable,
        text_column: &str,
        date_column: &str,
    ) -> Result<Vec<ScoredRecord>> {
        let text_index = table.column_index(text_column).ok_or_else(|| {
            AppError::Validation(format!("Text column not found: {}", text_column))
        })?;

        let dates: Vec<Option<NaiveDate>> = match table.column_index(date_column) {
            Some(index) => table.column_values(index).map(parse_date).collect(),
            None => vec![None; table.len()],
        };

        let records: Vec<ScoredRecord> = table
            .column_values(text_index)
            .zip(dates)
            .map(|(text, date)| ScoredRecord {
                date,
                sentiment: self.model.polarity(text),
            })
            .collect();

        debug!(
            "Scored {} records with model {}",
            records.len(),
            self.model.name()
        );

        Ok(records)
    }
}

/// Среднее значение настроения по календарным дням.
/// Записи без даты или с NaN не учитываются.
pub fn aggregate_by_date(records: &[ScoredRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        if record.sentiment.is_nan() {
            continue;
        }
        let entry = sums.entry(date).or_insert((0.0, 0));
        entry.0 += record.sentiment;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}
