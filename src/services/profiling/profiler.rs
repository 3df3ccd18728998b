// File: src/services/profiling/profiler.rs
use crate::app_state::models::AppState;
use crate::error::Result;
use crate::services::correlation::aggregator::pearson;
use crate::services::indicators::processor::file_name;
use crate::storage::models::summary::{ColumnMap, ColumnStats, DatasetProfile};
use crate::storage::models::table::RawTable;
use crate::utils::numbers::finite;
use statrs::statistics::Statistics;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

const MAX_LISTED_COLUMNS: usize = 20;

// Значения, которые считаются пропуском
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "<NA>", "#N/A",
];

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Int,
    Float,
    Bool,
    Object,
}

impl ColumnType {
    fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Object => "object",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

/// Тип колонки по непустым значениям.
/// Целые с пропусками становятся float64, полностью пустая колонка тоже float64.
fn infer_type(table: &RawTable, index: usize) -> ColumnType {
    let mut has_missing = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut seen = 0usize;

    for value in table.column_values(index) {
        if is_missing(value) {
            has_missing = true;
            continue;
        }
        seen += 1;
        let value = value.trim();
        all_int &= value.parse::<i64>().is_ok();
        all_float &= value.parse::<f64>().is_ok();
        all_bool &= matches!(value, "True" | "False" | "true" | "false");
    }

    match (seen, all_int, all_float, all_bool) {
        (0, ..) => ColumnType::Float,
        (_, true, ..) if has_missing => ColumnType::Float,
        (_, true, ..) => ColumnType::Int,
        (_, _, true, _) => ColumnType::Float,
        (_, _, _, true) if !has_missing => ColumnType::Bool,
        _ => ColumnType::Object,
    }
}

fn numeric_values(table: &RawTable, index: usize) -> Vec<f64> {
    table
        .column_values(index)
        .map(|value| {
            if is_missing(value) {
                f64::NAN
            } else {
                value.trim().parse::<f64>().unwrap_or(f64::NAN)
            }
        })
        .collect()
}

/// Перцентиль с линейной интерполяцией между соседними значениями
/// отсортированной выборки
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// count/mean/std/min/квартили/max по непропущенным значениям
fn describe(values: &[f64]) -> ColumnStats {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let count = present.len();
    if count == 0 {
        return ColumnStats {
            count,
            mean: None,
            std: None,
            min: None,
            q25: None,
            q50: None,
            q75: None,
            max: None,
        };
    }

    let mut sorted = present.clone();
    sorted.sort_by(f64::total_cmp);

    ColumnStats {
        count,
        mean: finite(present.iter().mean()),
        std: finite(present.iter().std_dev()),
        min: finite(Statistics::min(present.iter())),
        q25: finite(percentile(&sorted, 0.25)),
        q50: finite(percentile(&sorted, 0.5)),
        q75: finite(percentile(&sorted, 0.75)),
        max: finite(Statistics::max(present.iter())),
    }
}

/// Попарная корреляция по строкам, где оба значения присутствуют
fn pairwise_pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let (a, b): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (*a, *b))
        .unzip();
    pearson(&a, &b)
}

/// Строит профиль прочитанной таблицы
pub fn profile_table(table: &RawTable, profile: &mut DatasetProfile) {
    let headers = &table.headers;

    let mut dtypes = Vec::with_capacity(headers.len());
    let mut missing = Vec::with_capacity(headers.len());
    let mut numeric: Vec<(String, Vec<f64>)> = Vec::new();

    for (index, header) in headers.iter().enumerate() {
        let column_type = infer_type(table, index);
        dtypes.push((header.clone(), column_type.as_str().to_string()));
        missing.push((
            header.clone(),
            table.column_values(index).filter(|v| is_missing(v)).count(),
        ));
        if column_type.is_numeric() {
            numeric.push((header.clone(), numeric_values(table, index)));
        }
    }

    let describe_map: ColumnMap<ColumnStats> = numeric
        .iter()
        .map(|(name, values)| (name.clone(), describe(values)))
        .collect();

    let correlation: ColumnMap<ColumnMap<Option<f64>>> = numeric
        .iter()
        .map(|(name, values)| {
            let row = numeric
                .iter()
                .map(|(other, other_values)| {
                    (other.clone(), pairwise_pearson(values, other_values))
                })
                .collect();
            (name.clone(), row)
        })
        .collect();

    profile.file_type = Some("csv".to_string());
    profile.shape = Some((table.len(), headers.len()));
    profile.columns = Some(headers.iter().take(MAX_LISTED_COLUMNS).cloned().collect());
    profile.dtypes = Some(dtypes.into_iter().collect());
    profile.describe = Some(describe_map);
    profile.missing = Some(missing.into_iter().collect());
    profile.correlation = Some(correlation);
}

pub struct DatasetProfiler {
    app_state: Arc<AppState>,
}

impl DatasetProfiler {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// Профилирует каждый файл сырого каталога.
    /// Нечитаемый файл получает профиль с ошибкой, обработка продолжается.
    pub fn trigger_update(&self) -> Result<Vec<DatasetProfile>> {
        let paths = &self.app_state.settings.app_config.paths;
        let storage = &self.app_state.storage_service;

        info!("Starting dataset profiling in {}", paths.raw_dir.display());

        let files = storage.repository_table.list_files(&paths.raw_dir, "")?;
        if files.is_empty() {
            warn!("No files found in {}", paths.raw_dir.display());
            return Ok(Vec::new());
        }

        storage.repository_report.ensure_dir(&paths.profile_out_dir)?;

        let mut profiles = Vec::with_capacity(files.len());
        for path in &files {
            let profile = self.profile_file(path)?;
            let out = paths
                .profile_out_dir
                .join(format!("{}_summary.json", profile.name));
            storage
                .repository_report
                .write_json(&out, &serde_json::to_value(&profile)?)?;
            profiles.push(profile);
        }

        info!(
            "Processed {} files. Summaries in {}",
            profiles.len(),
            paths.profile_out_dir.display()
        );

        Ok(profiles)
    }

    fn profile_file(&self, path: &Path) -> Result<DatasetProfile> {
        let size = fs::metadata(path)?.len();
        let mut profile = DatasetProfile::new(path.display().to_string(), file_name(path), size);

        match self.app_state.storage_service.repository_table.read_table(path) {
            Ok(table) => profile_table(&table, &mut profile),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                profile.error = Some(e.to_string());
            }
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_support::state_for;
    use serde_json::Value;
    use tempfile::tempdir;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_infer_types() {
        let t = table(
            &["i", "f", "gap", "b", "s", "empty"],
            &[
                &["1", "1.5", "3", "True", "x", ""],
                &["2", "2", "", "False", "y", ""],
            ],
        );
        let types: Vec<&str> = (0..6).map(|i| infer_type(&t, i).as_str()).collect();
        assert_eq!(types, vec!["int64", "float64", "float64", "bool", "object", "float64"]);
    }

    #[test]
    fn test_describe() {
        let stats = describe(&[1.0, 2.0, f64::NAN, 3.0, 4.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(2.5));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(4.0));
        assert_eq!(stats.q25, Some(1.75));
        assert_eq!(stats.q50, Some(2.5));
        assert_eq!(stats.q75, Some(3.25));
        assert!((stats.std.unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let single = describe(&[7.0]);
        assert_eq!(single.std, None);
        assert_eq!(describe(&[f64::NAN]).mean, None);
    }

    #[test]
    fn test_profile_table() {
        let t = table(
            &["a", "b", "label"],
            &[&["1", "2", "x"], &["2", "4", ""], &["3", "6", "z"]],
        );
        let mut profile = DatasetProfile::new("raw/t.csv".into(), "t.csv".into(), 10);
        profile_table(&t, &mut profile);

        assert_eq!(profile.shape, Some((3, 3)));
        assert_eq!(profile.missing.as_ref().unwrap().get("label"), Some(&1));
        let describe = profile.describe.as_ref().unwrap();
        assert!(describe.contains_key("a"));
        assert!(!describe.contains_key("label"));
        let corr = profile.correlation.as_ref().unwrap();
        let ab = corr.get("a").unwrap().get("b").unwrap().unwrap();
        assert!((ab - 1.0).abs() < 1e-9);
        assert!(!corr.contains_key("label"));
    }

    #[test]
    fn test_profile_keeps_header_order() {
        let t = table(&["zeta", "alpha", "note"], &[&["1", "3", "x"], &["2", "1", "y"]]);
        let mut profile = DatasetProfile::new("p".into(), "n".into(), 0);
        profile_table(&t, &mut profile);

        let dtypes: Vec<&str> = profile.dtypes.as_ref().unwrap().keys().collect();
        assert_eq!(dtypes, vec!["zeta", "alpha", "note"]);
        let described: Vec<&str> = profile.describe.as_ref().unwrap().keys().collect();
        assert_eq!(described, vec!["zeta", "alpha"]);

        let json = serde_json::to_string(profile.missing.as_ref().unwrap()).unwrap();
        assert_eq!(json, r#"{"zeta":0,"alpha":0,"note":0}"#);
        let json = serde_json::to_string(profile.correlation.as_ref().unwrap()).unwrap();
        assert!(json.starts_with(r#"{"zeta":{"zeta":"#));
    }

    #[test]
    fn test_columns_truncated_to_twenty() {
        let headers: Vec<String> = (0..25).map(|i| format!("c{}", i)).collect();
        let t = RawTable::new(headers, vec![]);
        let mut profile = DatasetProfile::new("p".into(), "n".into(), 0);
        profile_table(&t, &mut profile);
        assert_eq!(profile.columns.as_ref().unwrap().len(), 20);
        assert_eq!(profile.shape, Some((0, 25)));
    }

    #[test]
    fn test_trigger_update_writes_profiles() {
        let root = tempdir().unwrap();
        let raw = root.path().join("raw");
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join("prices.csv"), "Date,Close\n2020-01-01,1.5\n2020-01-02,2.5\n").unwrap();
        fs::write(raw.join("broken.csv"), "a,b\n1,2,3\n").unwrap();

        let profiles = DatasetProfiler::new(state_for(root.path(), ""))
            .trigger_update()
            .unwrap();
        assert_eq!(profiles.len(), 2);

        let out = root.path().join("out/summaries");
        let good: Value = serde_json::from_str(
            &fs::read_to_string(out.join("prices.csv_summary.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(good["type"], "csv");
        assert_eq!(good["shape"], serde_json::json!([2, 2]));
        assert_eq!(good["dtypes"]["Close"], "float64");
        assert_eq!(good["describe"]["Close"]["mean"], 2.0);

        let bad: Value = serde_json::from_str(
            &fs::read_to_string(out.join("broken.csv_summary.json")).unwrap(),
        )
        .unwrap();
        assert!(bad["error"].is_string());
        assert!(bad.get("shape").is_none());
    }
}
