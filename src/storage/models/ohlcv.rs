// File: src/storage/models/ohlcv.rs
use chrono::NaiveDateTime;

pub const OHLCV_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// Колонка, перенесенная из исходного файла без изменений
#[derive(Debug, Clone, PartialEq)]
pub struct TextColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// Рассчитанная числовая колонка
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl NumericColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Таблица OHLCV в каноническом виде, строки упорядочены по дате
#[derive(Debug, Clone, Default)]
pub struct OhlcvTable {
    // Базовый индекс; некорректные даты хранятся как None
    pub dates: Vec<Option<NaiveDateTime>>,

    // Базовые цены
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,

    // Прочие колонки исходного файла
    pub passthrough: Vec<TextColumn>,
}

impl OhlcvTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Канонические колонки по имени
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            "Open" => Some(&self.open),
            "High" => Some(&self.high),
            "Low" => Some(&self.low),
            "Close" => Some(&self.close),
            "Volume" => Some(&self.volume),
            _ => None,
        }
    }

    /// Оставляет строки, для которых `keep` вернул true
    pub fn retain_rows(&self, keep: impl Fn(usize) -> bool) -> OhlcvTable {
        let indices: Vec<usize> = (0..self.len()).filter(|i| keep(*i)).collect();
        self.select_rows(&indices)
    }

    /// Строки в заданном порядке индексов
    pub fn select_rows(&self, indices: &[usize]) -> OhlcvTable {
        let pick = |values: &[f64]| indices.iter().map(|i| values[*i]).collect::<Vec<f64>>();

        OhlcvTable {
            dates: indices.iter().map(|i| self.dates[*i]).collect(),
            open: pick(&self.open),
            high: pick(&self.high),
            low: pick(&self.low),
            close: pick(&self.close),
            volume: pick(&self.volume),
            passthrough: self
                .passthrough
                .iter()
                .map(|column| TextColumn {
                    name: column.name.clone(),
                    values: indices.iter().map(|i| column.values[*i].clone()).collect(),
                })
                .collect(),
        }
    }

    /// Убирает строки без цены закрытия
    pub fn without_missing_close(&self) -> OhlcvTable {
        self.retain_rows(|i| !self.close[i].is_nan())
    }
}

/// Таблица OHLCV, дополненная техническими индикаторами
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    pub ohlcv: OhlcvTable,
    pub derived: Vec<NumericColumn>,
}

impl IndicatorTable {
    pub fn len(&self) -> usize {
        self.ohlcv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ohlcv.is_empty()
    }

    /// Ищет колонку среди канонических, затем среди рассчитанных
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.ohlcv.column(name).or_else(|| {
            self.derived
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.values.as_slice())
        })
    }
}
