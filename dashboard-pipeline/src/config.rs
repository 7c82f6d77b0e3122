use serde::Deserialize;
use std::{fs, path::PathBuf};

/// Config file looked up in the working directory. Absent file means defaults.
pub const CONFIG_FILE: &str = "campus-energy.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub file_name: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            file_name: "dashboard.svg".to_string(),
            title: "Campus Energy Dashboard".to_string(),
            width: 1400,
            height: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub cleaned_file: String,
    pub summary_file: String,
    pub report_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            cleaned_file: "cleaned_energy_data.csv".to_string(),
            summary_file: "building_summary.csv".to_string(),
            report_file: "summary.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dashboard: DashboardConfig,
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            dashboard: DashboardConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = PathBuf::from(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join(&self.dashboard.file_name)
    }
}
