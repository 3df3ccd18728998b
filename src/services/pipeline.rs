// File: src/services/pipeline.rs
use crate::app_state::models::AppState;
use crate::services::correlation::processor::{CorrelationOutcome, CorrelationProcessor};
use crate::services::indicators::processor::IndicatorsProcessor;
use crate::services::plotting::processor::PlotsProcessor;
use crate::services::profiling::profiler::DatasetProfiler;
use std::sync::Arc;
use tracing::{error, info};

/// Какие этапы завершились без ошибки уровня этапа
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub profiled: Option<usize>,
    pub indicators: Option<usize>,
    pub plotted: Option<usize>,
    pub correlated: Option<usize>,
}

/// Последовательно запускает включенные этапы: профилирование, индикаторы,
/// графики, корреляция.
/// Ошибка этапа логируется, следующий этап все равно выполняется.
pub fn run_pipeline(app_state: &Arc<AppState>) -> PipelineReport {
    let stages = &app_state.settings.app_config.stages;
    let mut report = PipelineReport::default();

    if stages.profile {
        match DatasetProfiler::new(app_state.clone()).trigger_update() {
            Ok(profiles) => {
                info!("Profiling completed: {} files", profiles.len());
                report.profiled = Some(profiles.len());
            }
            Err(err) => error!("Failed to profile raw datasets: {}", err),
        }
    } else {
        info!("Profiling stage disabled");
    }

    if stages.indicators {
        match IndicatorsProcessor::new(app_state.clone()).trigger_update() {
            Ok(summaries) => {
                let processed = summaries.values().filter(|e| e.is_ok()).count();
                info!(
                    "Indicators completed: {} of {} files processed",
                    processed,
                    summaries.len()
                );
                report.indicators = Some(processed);
            }
            Err(err) => error!("Failed to calculate indicators: {}", err),
        }
    } else {
        info!("Indicators stage disabled");
    }

    if stages.plots {
        match PlotsProcessor::new(app_state.clone()).trigger_update() {
            Ok(summaries) => {
                let plotted = summaries.values().filter(|e| e.is_ok()).count();
                info!("Plots completed: {} tickers", plotted);
                report.plotted = Some(plotted);
            }
            Err(err) => error!("Failed to build plots: {}", err),
        }
    } else {
        info!("Plots stage disabled");
    }

    if stages.sentiment_correlation {
        match CorrelationProcessor::new(app_state.clone()).trigger_update() {
            Ok(CorrelationOutcome::Completed(summaries)) => {
                let correlated = summaries.values().filter(|e| e.is_ok()).count();
                info!("Sentiment correlation completed: {} tickers", correlated);
                report.correlated = Some(correlated);
            }
            Ok(CorrelationOutcome::Skipped(reason)) => {
                info!("Sentiment correlation skipped: {}", reason);
            }
            Err(err) => error!("Failed to correlate sentiment: {}", err),
        }
    } else {
        info!("Sentiment correlation stage disabled");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_support::state_for;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_stages_run_in_order() {
        let root = tempdir().unwrap();
        let stocks = root.path().join("stocks");
        fs::create_dir_all(&stocks).unwrap();
        fs::write(
            stocks.join("MSFT.csv"),
            "date,open,high,low,close,volume\n\
             2020-01-03,3,3,3,3,1\n\
             2020-01-01,1,1,1,1,1\n\
             2020-01-02,2,2,2,2,1\n",
        )
        .unwrap();
        fs::write(
            root.path().join("news.csv"),
            "headline,date\nShares rally,2020-01-02\nStocks surge again,2020-01-03\n",
        )
        .unwrap();

        let extra = "[stages]\nprofile = true\n\n[sentiment]\nproviders = [\"lexicon\"]\n";
        let report = run_pipeline(&state_for(root.path(), extra));

        // Каталога raw нет: профилирование проходит без файлов
        assert_eq!(report.profiled, Some(0));
        assert_eq!(report.indicators, Some(1));
        assert_eq!(report.plotted, Some(1));
        assert_eq!(report.correlated, Some(1));
        assert!(root.path().join("out/plots/MSFT_rsi_macd.png").exists());
        assert!(root.path().join("out/correlation/MSFT_sentiment_summary.json").exists());
    }

    #[test]
    fn test_disabled_stages_are_skipped() {
        let root = tempdir().unwrap();
        let extra = "[stages]\nindicators = false\nplots = false\nsentiment_correlation = false\n";
        let report = run_pipeline(&state_for(root.path(), extra));
        assert_eq!(report, PipelineReport::default());
    }
}
