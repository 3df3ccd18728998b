// File: src/services/plotting/processor.rs
use super::charts::{Line, draw_momentum_chart, draw_price_chart};
use crate::app_state::models::AppState;
use crate::error::{AppError, Result};
use crate::services::indicators::processor::{INDICATORS_SUFFIX, file_stem};
use crate::storage::models::summary::{PlotSummary, ReportEntry};
use plotters::style::{BLACK, BLUE, MAGENTA, RED};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const PRICE_CHART_SUFFIX: &str = "_close_ma.png";
pub const MOMENTUM_CHART_SUFFIX: &str = "_rsi_macd.png";

const MA_PLOT_WINDOW: usize = 21;

pub struct PlotsProcessor {
    app_state: Arc<AppState>,
}

impl PlotsProcessor {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// Строит графики по каждому файлу индикаторов.
    /// Ошибка по одному тикеру логируется, остальные строятся дальше.
    pub fn trigger_update(&self) -> Result<BTreeMap<String, ReportEntry<PlotSummary>>> {
        let paths = &self.app_state.settings.app_config.paths;
        let storage = &self.app_state.storage_service;

        info!("Starting plots update from {}", paths.indicators_out_dir.display());

        let mut summaries = BTreeMap::new();
        let files = storage
            .repository_table
            .list_files(&paths.indicators_out_dir, INDICATORS_SUFFIX)?;

        if files.is_empty() {
            warn!(
                "No indicator CSVs found in {}",
                paths.indicators_out_dir.display()
            );
            return Ok(summaries);
        }

        storage.repository_report.ensure_dir(&paths.plots_out_dir)?;

        for path in &files {
            let stem = file_stem(path);
            let ticker = stem.strip_suffix("_indicators").unwrap_or(&stem).to_string();

            let entry = match self.plot_ticker(path, &ticker) {
                Ok(summary) => ReportEntry::Ok(summary),
                Err(e) => {
                    error!("Error plotting {}: {}", ticker, e);
                    ReportEntry::failed(e.to_string())
                }
            };
            summaries.insert(ticker, entry);
        }

        let plotted = summaries.values().filter(|e| e.is_ok()).count();
        info!(
            "Completed plots update: {} of {} tickers plotted into {}",
            plotted,
            summaries.len(),
            paths.plots_out_dir.display()
        );

        Ok(summaries)
    }

    fn plot_ticker(&self, path: &Path, ticker: &str) -> Result<PlotSummary> {
        let out_dir = &self.app_state.settings.app_config.paths.plots_out_dir;

        let table = self
            .app_state
            .storage_service
            .repository_indicator
            .read_indicators(path)?;
        if table.is_empty() {
            return Err(AppError::Validation(format!(
                "no rows to plot in {}",
                path.display()
            )));
        }

        let column = |name: &str| table.column(name).unwrap_or(&[]);
        let sma = format!("sma_{}", MA_PLOT_WINDOW);
        let ema = format!("ema_{}", MA_PLOT_WINDOW);

        // Скользящие средние рисуются, только если окно было в расчете
        let price_lines: Vec<Line<'_>> = [
            ("Close", BLACK),
            (sma.as_str(), BLUE),
            (ema.as_str(), MAGENTA),
        ]
        .into_iter()
        .filter(|(name, _)| table.column(name).is_some())
        .map(|(label, color)| Line {
            label,
            values: column(label),
            color,
        })
        .collect();

        let price_file = format!("{}{}", ticker, PRICE_CHART_SUFFIX);
        draw_price_chart(&out_dir.join(&price_file), ticker, table.len(), &price_lines)?;

        let rsi = Line {
            label: "rsi_14",
            values: column("rsi_14"),
            color: BLUE,
        };
        let macd = [
            Line {
                label: "macd",
                values: column("macd"),
                color: BLUE,
            },
            Line {
                label: "macd_signal",
                values: column("macd_signal"),
                color: RED,
            },
        ];

        let momentum_file = format!("{}{}", ticker, MOMENTUM_CHART_SUFFIX);
        draw_momentum_chart(&out_dir.join(&momentum_file), ticker, table.len(), &rsi, &macd)?;

        debug!("Plotted {} rows for {}", table.len(), ticker);

        Ok(PlotSummary {
            ticker: ticker.to_string(),
            rows: table.len(),
            files: vec![price_file, momentum_file],
        })
    }
}
