// File: src/storage/repository/report_repository.rs
use crate::error::Result;
use crate::storage::models::summary::CorrelationRow;
use crate::utils::numbers::format_f64;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

pub trait TraitReportRepository {
    /// Создает каталог отчетов вместе с родительскими
    fn ensure_dir(&self, dir: &Path) -> Result<()>;

    /// Записывает JSON с отступом в 2 пробела
    fn write_json(&self, path: &Path, value: &Value) -> Result<()>;

    /// Записывает `ticker,corr,overlap_days`; заголовок пишется даже без строк
    fn write_correlations(&self, path: &Path, rows: &[CorrelationRow]) -> Result<()>;
}

pub struct StructFileReportRepository;

impl StructFileReportRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StructFileReportRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TraitReportRepository for StructFileReportRepository {
    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        Ok(())
    }

    fn write_json(&self, path: &Path, value: &Value) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn write_correlations(&self, path: &Path, rows: &[CorrelationRow]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["ticker", "corr", "overlap_days"])?;

        for row in rows {
            let corr = row.corr.map(format_f64).unwrap_or_default();
            writer.write_record([
                row.ticker.as_str(),
                corr.as_str(),
                row.overlap_days.to_string().as_str(),
            ])?;
        }

        writer.flush()?;
        debug!("Wrote {} correlation rows to {}", rows.len(), path.display());
        Ok(())
    }
}
