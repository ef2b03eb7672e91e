use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::TimeKind;

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Names of the CSV columns the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub time: String,
    pub temperature: String,
    pub humidity: String,
    /// Optional grouping column. Files without it are shown ungrouped.
    pub location: Option<String>,
    pub time_kind: TimeKind,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            time: "Time".to_string(),
            temperature: "Temperature (°C)".to_string(),
            humidity: "Humidity (%)".to_string(),
            location: Some("Location".to_string()),
            time_kind: TimeKind::Auto,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Everything the shell needs before the first frame.
///
/// ```json
/// {
///   "data_path": "environment_data.csv",
///   "columns": { "time": "Date", "location": null, "time_kind": "date" },
///   "preview_rows": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub columns: ColumnMapping,
    /// Rows shown in the data preview grid.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("environment_data.csv"),
            columns: ColumnMapping::default(),
            preview_rows: 5,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid dashboard config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn partial_columns_keep_other_defaults() {
        let cfg = DashboardConfig::from_json(
            r#"{ "data_path": "x.csv", "columns": { "time": "Date", "location": null, "time_kind": "date" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("x.csv"));
        assert_eq!(cfg.columns.time, "Date");
        assert_eq!(cfg.columns.temperature, "Temperature (°C)");
        assert_eq!(cfg.columns.location, None);
        assert_eq!(cfg.columns.time_kind, TimeKind::Date);
        assert_eq!(cfg.preview_rows, 5);
    }

    #[test]
    fn unknown_time_kind_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "columns": { "time_kind": "epoch" } }"#).is_err());
    }

    #[test]
    fn missing_file_has_context() {
        let err = DashboardConfig::load(Path::new("/no/such/config.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/no/such/config.json"));
    }
}
