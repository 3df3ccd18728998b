// File: src/services/market_data/standardizer.rs
use crate::storage::models::ohlcv::{OhlcvTable, TextColumn};
use crate::storage::models::table::RawTable;
use crate::utils::dates::parse_datetime;
use crate::utils::numbers::parse_f64;
use chrono::NaiveDateTime;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Canonical {
    Open,
    High,
    Low,
    Close,
    Volume,
}

/// Индекс колонки с датой: Date, затем Datetime, затем безымянный индекс
fn find_date_column(headers: &[String]) -> Option<usize> {
    ["date", "datetime"]
        .iter()
        .find_map(|name| headers.iter().position(|h| h.to_lowercase() == *name))
        .or_else(|| match headers.first().map(String::as_str) {
            Some("") | Some("Unnamed: 0") => Some(0),
            _ => None,
        })
}

fn is_close(lower: &str) -> bool {
    lower == "close" || lower == "close*"
}

/// Приводит сырую таблицу к каноническому виду OHLCV.
///
/// Колонки Open/High/Low/Close/Volume распознаются без учета регистра,
/// `Adj Close`/`adj_close` становится Close только если обычного Close нет.
/// Недостающие колонки заполняются NaN, некорректные даты становятся None,
/// строки сортируются по дате (None в конце).
pub fn standardize(raw: &RawTable) -> OhlcvTable {
    let headers: Vec<String> = raw.headers.iter().map(|h| h.trim().to_string()).collect();
    let date_idx = find_date_column(&headers);
    let has_close = headers.iter().any(|h| is_close(&h.to_lowercase()));

    // Сопоставление колонок каноническим именам, первое совпадение выигрывает
    let mut mapped: Vec<(Canonical, usize)> = Vec::new();
    let mut passthrough_idx: Vec<usize> = Vec::new();

    for (idx, header) in headers.iter().enumerate() {
        if Some(idx) == date_idx {
            continue;
        }
        let lower = header.to_lowercase();
        let target = match lower.as_str() {
            "open" => Some(Canonical::Open),
            "high" => Some(Canonical::High),
            "low" => Some(Canonical::Low),
            "volume" => Some(Canonical::Volume),
            l if is_close(l) => Some(Canonical::Close),
            "adj close" | "adj_close" if !has_close => Some(Canonical::Close),
            _ => None,
        };

        match target {
            Some(canonical) if !mapped.iter().any(|(c, _)| *c == canonical) => {
                mapped.push((canonical, idx));
            }
            _ => passthrough_idx.push(idx),
        }
    }

    let numeric = |canonical: Canonical| -> Vec<f64> {
        match mapped.iter().find(|(c, _)| *c == canonical) {
            Some((_, idx)) => raw.column_values(*idx).map(parse_f64).collect(),
            None => vec![f64::NAN; raw.len()],
        }
    };

    let dates: Vec<Option<NaiveDateTime>> = match date_idx {
        Some(idx) => raw.column_values(idx).map(parse_datetime).collect(),
        None => vec![None; raw.len()],
    };

    let unsorted = OhlcvTable {
        dates,
        open: numeric(Canonical::Open),
        high: numeric(Canonical::High),
        low: numeric(Canonical::Low),
        close: numeric(Canonical::Close),
        volume: numeric(Canonical::Volume),
        passthrough: passthrough_idx
            .iter()
            .map(|idx| TextColumn {
                name: headers[*idx].clone(),
                values: raw.column_values(*idx).map(String::from).collect(),
            })
            .collect(),
    };

    let mut order: Vec<usize> = (0..unsorted.len()).collect();
    order.sort_by_key(|i| (unsorted.dates[*i].is_none(), unsorted.dates[*i]));

    debug!(
        "Standardized {} rows, {} passthrough columns, date column: {:?}",
        unsorted.len(),
        unsorted.passthrough.len(),
        date_idx.map(|idx| headers[idx].as_str())
    );

    unsorted.select_rows(&order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dates::parse_datetime;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_lowercase_columns_become_canonical_and_sorted() {
        let table = raw(
            &["date", "open", "high", "low", "close", "volume"],
            &[
                &["2020-01-03", "3", "3.5", "2.5", "3.2", "300"],
                &["2020-01-01", "1", "1.5", "0.5", "1.2", "100"],
                &["2020-01-02", "2", "2.5", "1.5", "2.2", "200"],
            ],
        );

        let out = standardize(&table);
        assert_eq!(
            out.dates,
            vec![
                parse_datetime("2020-01-01"),
                parse_datetime("2020-01-02"),
                parse_datetime("2020-01-03"),
            ]
        );
        assert_eq!(out.open, vec![1.0, 2.0, 3.0]);
        assert_eq!(out.high, vec![1.5, 2.5, 3.5]);
        assert_eq!(out.low, vec![0.5, 1.5, 2.5]);
        assert_eq!(out.close, vec![1.2, 2.2, 3.2]);
        assert_eq!(out.volume, vec![100.0, 200.0, 300.0]);
        assert!(out.passthrough.is_empty());
    }

    #[test]
    fn test_adj_close_used_only_without_close() {
        let only_adj = raw(&["Date", "Adj Close"], &[&["2020-01-01", "9.5"]]);
        assert_eq!(standardize(&only_adj).close, vec![9.5]);

        let both = raw(
            &["Date", "Close", "Adj Close"],
            &[&["2020-01-01", "10", "9.5"]],
        );
        let out = standardize(&both);
        assert_eq!(out.close, vec![10.0]);
        assert_eq!(out.passthrough[0].name, "Adj Close");
        assert_eq!(out.passthrough[0].values, vec!["9.5"]);

        let underscore = raw(&["Date", "adj_close"], &[&["2020-01-01", "8"]]);
        assert_eq!(standardize(&underscore).close, vec![8.0]);
    }

    #[test]
    fn test_missing_columns_filled_with_nan() {
        let table = raw(&["Date", "Close"], &[&["2020-01-01", "10"]]);
        let out = standardize(&table);
        assert!(out.open[0].is_nan());
        assert!(out.high[0].is_nan());
        assert!(out.low[0].is_nan());
        assert!(out.volume[0].is_nan());
        assert_eq!(out.close, vec![10.0]);
    }

    #[test]
    fn test_malformed_dates_retained_and_sorted_last() {
        let table = raw(
            &[" Date ", "Close"],
            &[
                &["garbage", "1"],
                &["2020-01-02", "2"],
                &["2020-01-01", "3"],
            ],
        );
        let out = standardize(&table);
        assert_eq!(out.len(), 3);
        assert_eq!(out.close, vec![3.0, 2.0, 1.0]);
        assert_eq!(out.dates[2], None);
    }

    #[test]
    fn test_unnamed_index_column_used_as_date() {
        let table = raw(
            &["", "Close"],
            &[&["2020-01-02", "2"], &["2020-01-01", "1"]],
        );
        let out = standardize(&table);
        assert_eq!(out.close, vec![1.0, 2.0]);
        assert_eq!(out.dates[0], parse_datetime("2020-01-01"));
    }

    #[test]
    fn test_without_date_column_keeps_order() {
        let table = raw(&["Close", "Ticker"], &[&["2", "X"], &["1", "X"]]);
        let out = standardize(&table);
        assert_eq!(out.close, vec![2.0, 1.0]);
        assert!(out.dates.iter().all(Option::is_none));
        assert_eq!(out.passthrough[0].name, "Ticker");
    }

    #[test]
    fn test_non_numeric_values_become_nan() {
        let table = raw(&["Date", "Close", "Volume"], &[&["2020-01-01", "n/a", ""]]);
        let out = standardize(&table);
        assert!(out.close[0].is_nan());
        assert!(out.volume[0].is_nan());
    }
}
