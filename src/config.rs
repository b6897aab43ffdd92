use crate::audit_log::DEFAULT_LOG_FILE;
use crate::error::{Result, SoilAuditError};
use crate::font::{FontSource, DEFAULT_FONT_URL, FONT_CACHE_FILE_NAME};
use crate::report::PhotoQuality;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const FONT_URL_ENV: &str = "SOIL_AUDIT_FONT_URL";
const LOG_PATH_ENV: &str = "SOIL_AUDIT_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub font_url: String,
    /// 未指定なら設定フォルダ内
    pub font_cache_path: Option<PathBuf>,
    pub log_path: PathBuf,
    pub output_dir: PathBuf,
    /// high / medium / low
    pub photo_quality: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_url: DEFAULT_FONT_URL.into(),
            font_cache_path: None,
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            output_dir: PathBuf::from("."),
            photo_quality: PhotoQuality::default().to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SoilAuditError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("soil-audit"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    // 環境変数を優先
    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(FONT_URL_ENV) {
            self.font_url = url;
        }
        if let Ok(path) = std::env::var(LOG_PATH_ENV) {
            self.log_path = PathBuf::from(path);
        }
        self
    }

    pub fn photo_quality(&self) -> Result<PhotoQuality> {
        self.photo_quality.parse().map_err(SoilAuditError::Config)
    }

    /// フォント取得元（`offline` ならダウンロードしない）
    pub fn font_source(&self, offline: bool) -> Result<FontSource> {
        let cache_path = match &self.font_cache_path {
            Some(path) => path.clone(),
            None => Self::config_dir()?.join(FONT_CACHE_FILE_NAME),
        };
        let url = (!offline && !self.font_url.trim().is_empty()).then(|| self.font_url.clone());
        Ok(FontSource { url, cache_path })
    }

    pub fn set_font_url(&mut self, url: String) -> Result<()> {
        self.font_url = url;
        self.save()
    }
}
