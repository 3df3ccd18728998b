mod app_state;
mod env_config;
mod error;
mod logger;
mod services;
mod storage;
mod utils;

use app_state::models::AppState;
use env_config::models::{app_config::AppConfig, app_env::AppEnv, app_setting::AppSettings};
use error::Result;
use services::pipeline::run_pipeline;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

fn main() -> ExitCode {
    // Инициализация приложения
    let settings: Arc<AppSettings> = match initialize_application() {
        Ok(settings) => Arc::new(settings),
        Err(err) => {
            eprintln!("Failed to initialize application: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // Создание глобального состояния приложения
    let app_state: Arc<AppState> = Arc::new(AppState::from_settings(settings));

    // Запуск этапов обработки
    let report = run_pipeline(&app_state);
    info!(
        "Pipeline finished: profiled={:?}, indicators={:?}, plotted={:?}, correlated={:?}",
        report.profiled, report.indicators, report.plotted, report.correlated
    );

    ExitCode::SUCCESS
}

/// Инициализирует настройки и логирование приложения
fn initialize_application() -> Result<AppSettings> {
    // Загрузка переменных окружения и конфигурации
    let environment = AppEnv::new()?;
    let config = AppConfig::new(&environment.config_dir, &environment.env)?;
    let app_settings = AppSettings {
        app_config: config,
        app_env: environment,
    };

    // Настройка логирования с уровнем и форматом из конфигурации
    logger::init_logger(
        &app_settings.app_config.log.level,
        &app_settings.app_config.log.format,
        app_settings.app_env.is_local(),
    )?;

    info!("Starting sentiment correlation pipeline...");
    info!("Current environment: {}", app_settings.app_env.env);

    // Подробный вывод конфигурации в режиме разработки
    if app_settings.app_env.is_local() {
        info!("Running in local development mode");
        debug!("Configuration details: {:#?}", app_settings);
    } else {
        info!("Running in production mode");
    }

    Ok(app_settings)
}
