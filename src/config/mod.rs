// Configuration loader - some methods reserved for future use
#![allow(dead_code)]

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a measurelens analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the measure dependency dataset (TSV)
    pub dependencies_path: Option<PathBuf>,

    /// Path to the report definition (JSON)
    pub report_path: Option<PathBuf>,

    /// Report configuration
    pub report: ReportConfig,

    /// Analysis configuration
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json
    pub format: String,

    /// Show per-measure dependency detail in terminal output
    pub show_detail: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Only count a field reference as a used measure when it matches a
    /// known measure name. Without this, column properties would falsely
    /// appear "used" as measures.
    pub match_known_measures: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dependencies_path: None,
            report_path: None,
            report: ReportConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_detail: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            match_known_measures: true,
        }
    }
}

impl Config {
    /// Load configuration from a specific file (toml, yaml or json,
    /// chosen by extension)
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)
                .into_diagnostic()
                .wrap_err("invalid TOML config")?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .into_diagnostic()
                .wrap_err("invalid YAML config")?,
            Some("json") => serde_json::from_str(&content)
                .into_diagnostic()
                .wrap_err("invalid JSON config")?,
            _ => toml::from_str(&content)
                .into_diagnostic()
                .wrap_err("invalid config (assumed TOML)")?,
        };

        Ok(config)
    }

    /// Try the default config locations under the project directory
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let candidates = [
            ".measurelens.toml",
            ".measurelens.yaml",
            ".measurelens.yml",
            ".measurelens.json",
        ];

        for candidate in candidates {
            let path = dir.join(candidate);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}
