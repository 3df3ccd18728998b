// File: src/storage/models/table.rs

/// Сырая таблица CSV: заголовки и строки без какой-либо типизации
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Точное совпадение имени колонки
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Значения колонки по индексу; отсутствующие поля отдаются пустой строкой
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawTable {
        RawTable::new(
            vec!["date".to_string(), "headline".to_string()],
            vec![
                vec!["2020-01-01".to_string(), "Stocks rally".to_string()],
                vec!["2020-01-02".to_string()],
            ],
        )
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column_index("headline"), Some(1));
        assert!(!table.has_column("Headline"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_short_rows_yield_empty_values() {
        let table = sample();
        let values: Vec<&str> = table.column_values(1).collect();
        assert_eq!(values, vec!["Stocks rally", ""]);
    }
}
