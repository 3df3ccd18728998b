// File: src/services/sentiment/polarity.rs
use crate::env_config::models::app_config::PolarityModelKind;
use std::sync::Arc;
use tracing::{info, warn};

/// Модель тональности текста: оценка в диапазоне [-1, 1] или NaN
pub trait PolarityModel {
    fn name(&self) -> &'static str;

    fn polarity(&self, text: &str) -> f64;
}

/// VADER: compound-оценка общего словаря
#[cfg(feature = "vader")]
pub struct VaderModel {
    analyzer: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

#[cfg(feature = "vader")]
impl VaderModel {
    pub fn new() -> Self {
        Self {
            analyzer: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }
}

#[cfg(feature = "vader")]
impl Default for VaderModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "vader")]
impl PolarityModel for VaderModel {
    fn name(&self) -> &'static str {
        "vader"
    }

    fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return f64::NAN;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(f64::NAN)
    }
}

const POSITIVE_KEYWORDS: &[(&str, f64)] = &[
    ("beat", 0.3),
    ("beats", 0.3),
    ("bullish", 0.5),
    ("breakout", 0.3),
    ("breakthrough", 0.4),
    ("buy", 0.3),
    ("gain", 0.3),
    ("gains", 0.3),
    ("growth", 0.2),
    ("outperform", 0.4),
    ("partnership", 0.2),
    ("profit", 0.3),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("record high", 0.4),
    ("all-time high", 0.5),
    ("soar", 0.5),
    ("soars", 0.5),
    ("strong", 0.2),
    ("surge", 0.4),
    ("surges", 0.4),
    ("upgrade", 0.3),
    ("upgrades", 0.3),
];

const NEGATIVE_KEYWORDS: &[(&str, f64)] = &[
    ("bearish", -0.5),
    ("collapse", -0.5),
    ("crash", -0.5),
    ("crashes", -0.5),
    ("downgrade", -0.3),
    ("downgrades", -0.3),
    ("fraud", -0.5),
    ("lawsuit", -0.4),
    ("loss", -0.3),
    ("losses", -0.3),
    ("miss", -0.3),
    ("misses", -0.3),
    ("panic", -0.4),
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("sell", -0.3),
    ("sell-off", -0.4),
    ("selloff", -0.4),
    ("underperform", -0.4),
    ("weak", -0.2),
];

/// Финансовый словарь: сумма весов найденных слов, ограниченная [-1, 1].
/// Без совпадений оценка нулевая.
pub struct LexiconModel;

impl LexiconModel {
    fn normalize(text: &str) -> String {
        let words: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        format!(" {} ", words.join(" "))
    }
}

impl PolarityModel for LexiconModel {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return f64::NAN;
        }

        // Совпадение только по целым словам
        let normalized = Self::normalize(text);
        let score: f64 = POSITIVE_KEYWORDS
            .iter()
            .chain(NEGATIVE_KEYWORDS.iter())
            .filter(|(keyword, _)| normalized.contains(&format!(" {} ", keyword)))
            .map(|(_, weight)| weight)
            .sum();

        score.clamp(-1.0, 1.0)
    }
}

/// Заглушка на случай, когда ни одна модель не доступна
pub struct UnavailableModel;

impl PolarityModel for UnavailableModel {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn polarity(&self, _text: &str) -> f64 {
        f64::NAN
    }
}

#[cfg(feature = "vader")]
fn vader_model() -> Option<Arc<dyn PolarityModel>> {
    Some(Arc::new(VaderModel::new()))
}

#[cfg(not(feature = "vader"))]
fn vader_model() -> Option<Arc<dyn PolarityModel>> {
    None
}

/// Выбирает первую доступную модель из списка в порядке приоритета
pub fn detect_polarity_model(preferred: &[PolarityModelKind]) -> Arc<dyn PolarityModel> {
    for kind in preferred {
        let model = match kind {
            PolarityModelKind::Vader => vader_model(),
            PolarityModelKind::Lexicon => Some(Arc::new(LexiconModel) as Arc<dyn PolarityModel>),
        };
        match model {
            Some(model) => {
                info!("Using polarity model: {}", model.name());
                return model;
            }
            None => warn!("Polarity model {:?} is not compiled in, skipping", kind),
        }
    }

    warn!("No polarity model available, sentiment scores will be NaN");
    Arc::new(UnavailableModel)
}
