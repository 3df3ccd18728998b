// File: src/storage/repository/table_repository.rs
use crate::error::{AppError, Result};
use crate::storage::models::table::RawTable;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub trait TraitTableRepository {
    /// Файлы каталога, имя которых заканчивается на `suffix`, в порядке имен.
    /// Отсутствующий каталог дает пустой список.
    fn list_files(&self, dir: &Path, suffix: &str) -> Result<Vec<PathBuf>>;

    /// Читает CSV целиком в сырую таблицу
    fn read_table(&self, path: &Path) -> Result<RawTable>;
}

pub struct StructCsvTableRepository;

impl StructCsvTableRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StructCsvTableRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TraitTableRepository for StructCsvTableRepository {
    fn list_files(&self, dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            debug!("Directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(suffix));
            if path.is_file() && matches {
                files.push(path);
            }
        }
        files.sort();

        debug!(
            "Found {} files matching '*{}' in {}",
            files.len(),
            suffix,
            dir.display()
        );

        Ok(files)
    }

    fn read_table(&self, path: &Path) -> Result<RawTable> {
        let table = read_raw_csv(path)?;
        info!(
            "Read {} rows x {} columns from {}",
            table.len(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }
}

pub(crate) fn read_raw_csv(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(RawTable::new(headers, rows))
}
