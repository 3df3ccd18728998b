// File: src/storage/models/summary.rs
use serde::{Serialize, Serializer};

/// Запись сводного отчета: результат либо текст ошибки по файлу
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry<T> {
    Ok(T),
    Failed { error: String },
}

impl<T> ReportEntry<T> {
    pub fn failed(error: impl Into<String>) -> Self {
        ReportEntry::Failed {
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ReportEntry::Ok(_))
    }
}

/// Итог расчета индикаторов по одному файлу
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSummary {
    pub file: String,
    pub rows: usize,
    pub sharpe: Option<f64>,
    pub annual_vol: Option<f64>,
}

/// Итог корреляции доходности и настроения по одному тикеру
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationSummary {
    pub ticker: String,
    pub rows_stock: usize,
    pub rows_sentiment_days: usize,
    pub overlap_days: usize,
    pub pearson_corr: Option<f64>,
}

/// Графики, построенные по одному тикеру
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSummary {
    pub ticker: String,
    pub rows: usize,
    pub files: Vec<String>,
}

/// Строка `correlations.csv`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    pub ticker: String,
    pub corr: Option<f64>,
    pub overlap_days: usize,
}

impl From<&CorrelationSummary> for CorrelationRow {
    fn from(summary: &CorrelationSummary) -> Self {
        Self {
            ticker: summary.ticker.clone(),
            corr: summary.pearson_corr,
            overlap_days: summary.overlap_days,
        }
    }
}

/// Описательная статистика числовой колонки
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub q50: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Значения по колонкам в порядке заголовков исходного файла;
/// сериализуется как JSON-объект
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<T>(Vec<(String, T)>);

#[cfg(test)]
impl<T> ColumnMap<T> {
    pub fn get(&self, column: &str) -> Option<&T> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl<T> FromIterator<(String, T)> for ColumnMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        ColumnMap(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for ColumnMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, value)| (name, value)))
    }
}

/// Профиль сырого файла из каталога данных
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub path: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtypes: Option<ColumnMap<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<ColumnMap<ColumnStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<ColumnMap<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<ColumnMap<ColumnMap<Option<f64>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetProfile {
    pub fn new(path: String, name: String, size: u64) -> Self {
        Self {
            path,
            name,
            size,
            file_type: None,
            shape: None,
            columns: None,
            dtypes: None,
            describe: None,
            missing: None,
            correlation: None,
            error: None,
        }
    }
}
