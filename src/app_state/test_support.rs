use super::models::AppState;
use crate::env_config::models::{
    app_config::AppConfig,
    app_env::{AppEnv, Env},
    app_setting::AppSettings,
};
use std::path::Path;
use std::sync::Arc;

/// Конфигурация, в которой все пути указывают внутрь `root`
pub(crate) fn config_for(root: &Path, extra: &str) -> AppConfig {
    let p = |name: &str| root.join(name).display().to_string().replace('\\', "/");
    let content = format!(
        r#"
        [log]
        level = "info"
        format = "plain"

        [paths]
        raw_dir = "{raw}"
        stock_dir = "{stock}"
        news_file = "{news}"
        profile_out_dir = "{profile}"
        indicators_out_dir = "{indicators}"
        correlation_out_dir = "{correlation}"
        plots_out_dir = "{plots}"

        {extra}
        "#,
        raw = p("raw"),
        stock = p("stocks"),
        news = p("news.csv"),
        profile = p("out/summaries"),
        indicators = p("out/indicators"),
        correlation = p("out/correlation"),
        plots = p("out/plots"),
        extra = extra,
    );
    AppConfig::from_toml_str(&content).expect("test config must parse")
}

pub(crate) fn state_for(root: &Path, extra: &str) -> Arc<AppState> {
    let settings = AppSettings {
        app_config: config_for(root, extra),
        app_env: AppEnv {
            env: Env::Local,
            config_dir: "config".to_string(),
        },
    };
    Arc::new(AppState::from_settings(Arc::new(settings)))
}
