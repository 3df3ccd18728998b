use super::models::app_config::AppConfig;
use super::models::app_env::Env;
use crate::error::{AppError, Result};
use std::fs;
use std::path::Path;

impl AppConfig {
    /// Читает `{config_dir}/{env}.toml`
    pub fn new(config_dir: &str, env: &Env) -> Result<AppConfig> {
        let path = Path::new(config_dir).join(format!("{}.toml", env));
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<AppConfig> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.indicators.ma_windows.iter().any(|w| *w == 0) {
            return Err(AppError::Config(
                "indicators.ma_windows must contain only positive windows".to_string(),
            ));
        }
        Ok(())
    }
}
