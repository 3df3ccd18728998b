// src/app_state/models.rs
use crate::env_config::models::app_setting::AppSettings;
use crate::services::indicators::backend::{IndicatorBackend, detect_backend};
use crate::services::sentiment::polarity::{PolarityModel, detect_polarity_model};
use crate::storage::storage_service::StorageService;

use std::sync::Arc;

pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub storage_service: Arc<StorageService>,
    pub indicator_backend: Arc<dyn IndicatorBackend>,
    pub polarity_model: Arc<dyn PolarityModel>,
}

impl AppState {
    pub fn new(
        settings: Arc<AppSettings>,
        storage_service: Arc<StorageService>,
        indicator_backend: Arc<dyn IndicatorBackend>,
        polarity_model: Arc<dyn PolarityModel>,
    ) -> Self {
        Self {
            settings,
            storage_service,
            indicator_backend,
            polarity_model,
        }
    }

    /// Собирает состояние, выбирая доступные поставщики формул и модели настроения
    pub fn from_settings(settings: Arc<AppSettings>) -> Self {
        let indicator_backend = detect_backend(&settings.app_config.indicators.backends);
        let polarity_model = detect_polarity_model(&settings.app_config.sentiment.providers);

        Self::new(
            settings,
            Arc::new(StorageService::new()),
            indicator_backend,
            polarity_model,
        )
    }
}
