use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    pub server_port: u16,
    pub assets_dir: PathBuf,
    pub ocr_languages: String,
    pub page_segmentation_mode: i32,
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f32,
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

fn default_low_confidence_threshold() -> f32 {
    global_constants::DEFAULT_LOW_CONFIDENCE_THRESHOLD
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_port: global_constants::DEFAULT_SERVER_PORT,
            assets_dir: PathBuf::from(global_constants::DEFAULT_ASSETS_DIR),
            ocr_languages: global_constants::DEFAULT_OCR_LANGUAGES.to_string(),
            page_segmentation_mode: global_constants::DEFAULT_PAGE_SEGMENTATION_MODE,
            low_confidence_threshold: default_low_confidence_threshold(),
            download_dir: default_download_dir(),
        }
    }
}

impl AppSettings {
    /// Never fails: an unreadable settings file falls back to defaults, and
    /// environment overrides apply either way.
    pub fn load() -> Self {
        Self::load_or_default(Self::get_settings_file_path(), |key| {
            std::env::var(key).ok()
        })
    }

    pub fn load_or_default(
        settings_path: anyhow::Result<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let settings = settings_path
            .and_then(|path| Self::load_from_path(&path))
            .unwrap_or_else(|error| {
                log::warn!(
                    "[SETTINGS] Failed to load settings, using defaults: {:#}",
                    error
                );
                Self::default()
            });

        settings.with_env_overrides(lookup)
    }

    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            let default_settings = Self::default();
            if let Err(error) = default_settings.save_to_path(settings_path) {
                log::warn!(
                    "[SETTINGS] Could not write default settings to {:?}: {:#}",
                    settings_path,
                    error
                );
            }
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)
            .with_context(|| format!("Failed to read {:?}", settings_path))?;
        let settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {:?}", settings_path))?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!("[SETTINGS] OCR languages: {}", settings.ocr_languages);
        log::debug!("[SETTINGS] Assets directory: {:?}", settings.assets_dir);

        Ok(settings)
    }

    pub fn save_to_path(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    /// Environment values win over the settings file. Unparseable values are
    /// ignored with a warning.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup(global_constants::ENV_SERVER_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server_port = port,
                Err(error) => log::warn!(
                    "[SETTINGS] Ignoring invalid {} value '{}': {}",
                    global_constants::ENV_SERVER_PORT,
                    port,
                    error
                ),
            }
        }

        if let Some(assets_dir) = lookup(global_constants::ENV_ASSETS_DIR) {
            if !assets_dir.trim().is_empty() {
                self.assets_dir = PathBuf::from(assets_dir.trim());
            }
        }

        self
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_DIR_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
