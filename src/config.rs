//! Persistent application settings.
//!
//! Settings live in `<config_dir>/autoeda/config.json`; `AUTOEDA_CONFIG`
//! points at another file. A missing or unparsable file yields defaults.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analyser::logic::types::OutlierThresholds;
use crate::analyser::logic::{DEFAULT_CATEGORY_THRESHOLD, IoOptions};

pub const CONFIG_ENV_VAR: &str = "AUTOEDA_CONFIG";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Columns with at most this many distinct values are categorical
    pub category_threshold: usize,
    /// Tukey fence multiplier for IQR outlier detection
    pub iqr_multiplier: f64,
    /// Absolute z-score above which a value is an outlier
    pub zscore_threshold: f64,
    /// Target range for min-max scaling when a step does not give one
    pub default_scale_range: (f64, f64),
    /// Rows scanned by the CSV reader to infer column types
    pub infer_schema_length: usize,
    /// Dataset loaded when no input file is given
    pub example_dataset: Option<PathBuf>,
    /// Rows shown by text previews
    pub preview_row_limit: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            category_threshold: DEFAULT_CATEGORY_THRESHOLD,
            iqr_multiplier: OutlierThresholds::default().iqr_multiplier,
            zscore_threshold: OutlierThresholds::default().zscore_threshold,
            default_scale_range: (0.0, 1.0),
            infer_schema_length: 10_000,
            example_dataset: None,
            preview_row_limit: 20,
        }
    }
}

impl AppSettings {
    pub fn outlier_thresholds(&self) -> OutlierThresholds {
        OutlierThresholds {
            iqr_multiplier: self.iqr_multiplier,
            zscore_threshold: self.zscore_threshold,
        }
    }

    pub fn io_options(&self) -> IoOptions {
        IoOptions {
            infer_schema_length: self.infer_schema_length,
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autoeda")
        .join("config.json")
}

pub fn load_app_config() -> AppSettings {
    load_app_config_from(&get_config_path())
}

pub fn load_app_config_from(path: &std::path::Path) -> AppSettings {
    if path.exists()
        && let Ok(content) = std::fs::read_to_string(path)
    {
        match serde_json::from_str::<AppSettings>(&content) {
            Ok(settings) => return settings,
            Err(e) => {
                tracing::warn!("Ignoring invalid config {}: {e}", path.display());
            }
        }
    }

    AppSettings::default()
}

pub fn save_app_config(settings: &AppSettings) -> Result<()> {
    save_app_config_to(settings, &get_config_path())
}

pub fn save_app_config_to(settings: &AppSettings, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_heuristics() {
        let settings = AppSettings::default();
        assert_eq!(settings.category_threshold, 30);
        assert!((settings.iqr_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((settings.zscore_threshold - 3.0).abs() < f64::EPSILON);
        assert_eq!(settings.default_scale_range, (0.0, 1.0));
    }

    #[test]
    fn test_save_and_load_roundtrip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("config.json");

        let settings = AppSettings {
            category_threshold: 12,
            example_dataset: Some(PathBuf::from("data/titanic.csv")),
            ..Default::default()
        };
        save_app_config_to(&settings, &path)?;

        assert_eq!(load_app_config_from(&path), settings);
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "zscore_threshold": 2.5 }"#)?;

        let settings = load_app_config_from(&path);
        assert!((settings.zscore_threshold - 2.5).abs() < f64::EPSILON);
        assert_eq!(settings.category_threshold, 30);
        Ok(())
    }

    #[test]
    fn test_invalid_file_falls_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json")?;

        assert_eq!(load_app_config_from(&path), AppSettings::default());
        Ok(())
    }
}
