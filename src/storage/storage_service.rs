use crate::storage::repository::{
    indicator_repository::{StructCsvIndicatorRepository, TraitIndicatorRepository},
    report_repository::{StructFileReportRepository, TraitReportRepository},
    table_repository::{StructCsvTableRepository, TraitTableRepository},
};
use std::sync::Arc;
use tracing::info;

pub struct StorageService {
    // Входные таблицы (CSV)
    pub repository_table: Arc<dyn TraitTableRepository>,
    // Таблицы индикаторов (CSV)
    pub repository_indicator: Arc<dyn TraitIndicatorRepository>,
    // Отчеты (JSON/CSV)
    pub repository_report: Arc<dyn TraitReportRepository>,
}

impl StorageService {
    pub fn new() -> Self {
        info!("Initializing storage repositories");

        Self {
            repository_table: Arc::new(StructCsvTableRepository::new()),
            repository_indicator: Arc::new(StructCsvIndicatorRepository::new()),
            repository_report: Arc::new(StructFileReportRepository::new()),
        }
    }
}

impl Default for StorageService {
    fn default() -> Self {
        Self::new()
    }
}
