use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// ExcelMode
// ---------------------------------------------------------------------------

/// What an "Excel" export actually writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcelMode {
    /// A genuine `.xlsx` workbook.
    #[default]
    Workbook,
    /// The CSV bytes under a `.csv` name, for consumers that cannot read xlsx.
    DelimitedFallback,
}

// ---------------------------------------------------------------------------
// ExportMetadata
// ---------------------------------------------------------------------------

/// Document properties stamped into generated PDF and XLSX files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    pub subject: String,
    pub keywords: Vec<String>,
    /// Fixed creation timestamp. `None` stamps each document with the time
    /// it was generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    pub data_source: String,
    pub version: String,
}

impl Default for ExportMetadata {
    fn default() -> Self {
        Self {
            title: "ComplianceHub Report".into(),
            description: "Generated report from ComplianceHub SEBI Monitoring System".into(),
            author: "ComplianceHub Technologies".into(),
            subject: "SEBI Compliance Report".into(),
            keywords: ["SEBI", "Compliance", "Financial", "Monitoring", "Report"]
                .into_iter()
                .map(String::from)
                .collect(),
            created_date: None,
            data_source: "ComplianceHub System".into(),
            version: "1.0.0".into(),
        }
    }
}

impl ExportMetadata {
    /// The timestamp to write into a document generated now.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.created_date.unwrap_or_else(Utc::now)
    }

    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Export settings stored at `~/.compliancehub/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exported files land. Falls back to the user's download
    /// directory when unset.
    pub output_dir: Option<PathBuf>,
    pub default_filename: String,
    pub pdf_max_cell_chars: usize,
    pub excel_mode: ExcelMode,
    pub log_level: String,
    pub metadata: ExportMetadata,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_filename: "export".into(),
            pdf_max_cell_chars: 50,
            excel_mode: ExcelMode::Workbook,
            log_level: "info".into(),
            metadata: ExportMetadata::default(),
        }
    }
}

impl ExportConfig {
    /// Returns the base directory: `~/.compliancehub/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".compliancehub"))
    }

    /// Returns the config file path: `~/.compliancehub/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.compliancehub/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Returns the fallback exports directory: `~/.compliancehub/exports/`
    pub fn exports_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("exports"))
    }

    /// Ensures the base and logs directories exist.
    pub fn ensure_dirs() -> Result<()> {
        for dir in [Self::base_dir()?, Self::logs_dir()?] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }

    /// Loads config from disk, or creates the default file if missing.
    pub fn load() -> Result<Self> {
        Self::ensure_dirs()?;
        let path = Self::config_path()?;
        Self::load_from_path(&path)
    }

    /// Load config from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to_path(&path)
    }

    /// Save config to a specific file path, creating its parent directory.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// The directory exports are written to: the configured `output_dir`,
    /// else the platform download directory, else `~/.compliancehub/exports`.
    pub fn resolve_output_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Ok(dir.clone());
        }
        match dirs::download_dir() {
            Some(dir) => Ok(dir),
            None => Self::exports_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ExportConfig::default();
        assert_eq!(config.default_filename, "export");
        assert_eq!(config.pdf_max_cell_chars, 50);
        assert_eq!(config.excel_mode, ExcelMode::Workbook);
        assert_eq!(config.log_level, "info");
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn default_metadata_matches_product() {
        let meta = ExportMetadata::default();
        assert_eq!(meta.title, "ComplianceHub Report");
        assert_eq!(meta.author, "ComplianceHub Technologies");
        assert_eq!(meta.subject, "SEBI Compliance Report");
        assert_eq!(
            meta.keywords_joined(),
            "SEBI, Compliance, Financial, Monitoring, Report"
        );
        assert_eq!(meta.version, "1.0.0");
        assert!(meta.created_date.is_none());
    }

    #[test]
    fn fixed_timestamp_is_used_when_set() {
        let fixed = DateTime::parse_from_rfc3339("2024-12-01T14:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let meta = ExportMetadata {
            created_date: Some(fixed),
            ..ExportMetadata::default()
        };
        assert_eq!(meta.timestamp(), fixed);
    }

    #[test]
    fn load_creates_default_file_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let config = ExportConfig::load_from_path(&path).unwrap();
        assert_eq!(config, ExportConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let config = ExportConfig {
            output_dir: Some(tmp.path().join("out")),
            default_filename: "report".into(),
            pdf_max_cell_chars: 30,
            excel_mode: ExcelMode::DelimitedFallback,
            ..ExportConfig::default()
        };
        config.save_to_path(&path).unwrap();
        let loaded = ExportConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "excel_mode": "delimited_fallback" }"#).unwrap();
        let loaded = ExportConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.excel_mode, ExcelMode::DelimitedFallback);
        assert_eq!(loaded.pdf_max_cell_chars, 50);
        assert_eq!(loaded.metadata, ExportMetadata::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ExportConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn configured_output_dir_wins() {
        let config = ExportConfig {
            output_dir: Some(PathBuf::from("/srv/exports")),
            ..ExportConfig::default()
        };
        assert_eq!(
            config.resolve_output_dir().unwrap(),
            PathBuf::from("/srv/exports")
        );
    }

    #[test]
    fn excel_mode_serializes_snake_case() {
        let json = serde_json::to_string(&ExcelMode::DelimitedFallback).unwrap();
        assert_eq!(json, "\"delimited_fallback\"");
    }
}
