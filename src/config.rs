// Tally configuration - JSON file with defaults for anything left out
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::aggregation::DEFAULT_TOP_N;
use crate::error::{Result, TallyError};
use crate::export::DEFAULT_CSV_FILE;

const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 800;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Entries shown in the top categories/actions cards
    pub top_n: usize,
    /// Width of terminal bars, in cells
    pub bar_width: usize,
    pub csv_file_name: String,
    /// Where PNG charts go; current directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_dir: Option<PathBuf>,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            bar_width: 40,
            csv_file_name: DEFAULT_CSV_FILE.to_string(),
            chart_dir: None,
            chart_width: CHART_WIDTH,
            chart_height: CHART_HEIGHT,
        }
    }
}

impl TallyConfig {
    /// Load from an explicit path, or the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => match Self::config_file_path() {
                Some(p) if p.exists() => Self::load_from(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TallyConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|d| d.join("activity-tally").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.bar_width == 0 {
            return Err(TallyError::Config("bar_width must be at least 1".to_string()));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(TallyError::Config(
                "chart_width and chart_height must be non-zero".to_string(),
            ));
        }
        if self.csv_file_name.trim().is_empty() {
            return Err(TallyError::Config("csv_file_name is empty".to_string()));
        }
        Ok(())
    }

    pub fn csv_path(&self) -> PathBuf {
        PathBuf::from(&self.csv_file_name)
    }

    pub fn chart_dir(&self) -> PathBuf {
        self.chart_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TallyConfig::default();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.csv_file_name, "activity_data.csv");
        assert_eq!(config.chart_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"top_n": 3}"#).unwrap();

        let config = TallyConfig::load(Some(&path)).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.bar_width, 40);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = TallyConfig {
            chart_dir: Some(dir.path().join("charts")),
            ..TallyConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(TallyConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"bar_width": 0}"#).unwrap();
        assert!(matches!(
            TallyConfig::load_from(&path),
            Err(TallyError::Config(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(TallyConfig::load(Some(&dir.path().join("nope.json"))).is_err());
    }
}
