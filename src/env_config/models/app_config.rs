use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub stages: StagesConfig,
    #[serde(default)]
    pub indicators: IndicatorsConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

/// Input and output locations, all relative to the working directory unless absolute
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_dir: PathBuf,
    pub stock_dir: PathBuf,
    pub news_file: PathBuf,
    pub profile_out_dir: PathBuf,
    pub indicators_out_dir: PathBuf,
    pub correlation_out_dir: PathBuf,
    pub plots_out_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            stock_dir: PathBuf::from("data/yfinance_data/Data"),
            news_file: PathBuf::from("data/newsData/raw_analyst_ratings.csv"),
            profile_out_dir: PathBuf::from("outputs/summaries"),
            indicators_out_dir: PathBuf::from("outputs/task2/local"),
            correlation_out_dir: PathBuf::from("outputs/task3"),
            plots_out_dir: PathBuf::from("outputs/task2/plots"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StagesConfig {
    pub profile: bool,
    pub indicators: bool,
    pub plots: bool,
    pub sentiment_correlation: bool,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            profile: false,
            indicators: true,
            plots: true,
            sentiment_correlation: true,
        }
    }
}

/// Backend formula providers, tried in the listed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorBackendKind {
    Wilder,
    Ewm,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndicatorsConfig {
    pub ma_windows: Vec<usize>,
    pub backends: Vec<IndicatorBackendKind>,
}

impl Default for IndicatorsConfig {
    fn default() -> Self {
        Self {
            ma_windows: vec![7, 21, 50],
            backends: vec![IndicatorBackendKind::Wilder, IndicatorBackendKind::Ewm],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarityModelKind {
    Vader,
    Lexicon,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub providers: Vec<PolarityModelKind>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            providers: vec![PolarityModelKind::Vader, PolarityModelKind::Lexicon],
        }
    }
}
