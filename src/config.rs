//! Dashboard configuration.
//!
//! Built-in defaults, optionally overridden by a JSON file whose path is
//! given in the `GRADE_PANDA_CONFIG` environment variable. Fields missing
//! from the file keep their defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "GRADE_PANDA_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub window_title: String,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    pub histogram_bins: usize,
    /// Default file name offered by the spreadsheet save dialog.
    pub export_file_name: String,
    pub csv_file_name: String,
    /// TTF/OTF font with CJK coverage; egui's bundled fonts have none.
    pub cjk_font_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_title: "📚 智能成绩管理系统".to_string(),
            window_size: [1400.0, 900.0],
            histogram_bins: 10,
            export_file_name: "成绩数据.xlsx".to_string(),
            csv_file_name: "成绩数据.csv".to_string(),
            cjk_font_path: None,
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        Ok(cfg.sanitized())
    }

    /// Load from `GRADE_PANDA_CONFIG` when set. Any failure is logged and the
    /// defaults are used instead.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        let path = PathBuf::from(path);
        match Self::from_file(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::error!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.histogram_bins == 0 {
            log::warn!("histogram_bins must be positive, using 1");
            self.histogram_bins = 1;
        }
        self
    }
}
