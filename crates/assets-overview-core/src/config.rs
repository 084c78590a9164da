use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/_resampled/**", "**/.htaccess", "**/web.config"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub asset_root: String,
    pub database_path: String,
    pub ignore_patterns: Vec<String>,
    /// Prefix the legacy layout stored file paths under.
    pub legacy_prefix: String,
    pub max_entries: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_root: "./public/assets".to_string(),
            database_path: "./assets.db".to_string(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            legacy_prefix: "assets/".to_string(),
            max_entries: None,
        }
    }
}

impl AppConfig {
    pub fn asset_root_path(&self) -> PathBuf {
        PathBuf::from(&self.asset_root)
    }
}

/// Load `Config.toml` (optional), overlaid by `ASSETS_OVERVIEW_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("ASSETS_OVERVIEW")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
