use super::models::app_env::{AppEnv, Env};
use crate::error::{AppError, Result};
use std::env;
use std::str::FromStr;

const DEFAULT_CONFIG_DIR: &str = "config";

impl AppEnv {
    pub fn new() -> Result<AppEnv> {
        Self::from_vars(env::var("ENV").ok(), env::var("CONFIG_DIR").ok())
    }

    /// Собирает окружение из уже прочитанных значений переменных
    pub fn from_vars(env: Option<String>, config_dir: Option<String>) -> Result<AppEnv> {
        let env = env.ok_or_else(|| AppError::Config("ENV -> ENV is not set".to_string()))?;

        Ok(AppEnv {
            env: Env::from_str(&env).map_err(AppError::Config)?,
            config_dir: config_dir
                .filter(|dir| !dir.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string()),
        })
    }
}
