use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_DRAFTS_DIR: &str = "drafts";
const DEFAULT_LOGO_PATH: &str = "images/tetfund_logo.png";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Directory holding autosave.json
    pub drafts_dir: Option<PathBuf>,
    /// PNG/JPEG drawn above the title block
    pub logo_path: Option<PathBuf>,
    /// TrueType font for the PDF (needed to print the ₦ glyph)
    pub font_path: Option<PathBuf>,
    /// Default export directory
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReportError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("monitoring-report").join("config.json"))
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.drafts_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DRAFTS_DIR))
    }

    pub fn logo_path(&self) -> PathBuf {
        self.logo_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGO_PATH))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
