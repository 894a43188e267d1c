//! Configuration schema types
//!
//! This module defines the structure of the `folio.toml` settings file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Folio configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Tableau server connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FolioConfig {
    /// Validates the configuration
    ///
    /// Server credentials are deliberately not checked here: missing values are
    /// passed through to sign-in, which reports them as a connection failure.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Tableau server connection settings
///
/// This is the explicit construction input of the REST client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server address, e.g. `https://tableau.example.com`
    #[serde(default)]
    pub url: String,

    /// Site content URL; empty selects the default site
    #[serde(default)]
    pub site: String,

    /// REST API version used in request paths
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Name of the personal access token
    #[serde(default)]
    pub token_name: String,

    /// Value of the personal access token
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub token_value: Option<SecretString>,

    /// TLS certificate verification enabled
    ///
    /// Disable only for servers with self-signed certificates on a trusted network.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Request timeout in seconds; PDF rendering of large views can be slow
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Page size used when listing workbooks
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            site: String::new(),
            api_version: default_api_version(),
            token_name: String::new(),
            token_value: None,
            tls_verify: true,
            timeout_seconds: default_timeout_seconds(),
            page_size: default_page_size(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.url.is_empty()
            && !self.url.starts_with("http://")
            && !self.url.starts_with("https://")
        {
            return Err("server.url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("server.timeout_seconds must be greater than 0".to_string());
        }

        if self.page_size == 0 || self.page_size > 1000 {
            return Err("server.page_size must be between 1 and 1000".to_string());
        }

        Ok(())
    }
}

/// Where rendered documents wait before the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StagingMode {
    /// Keep rendered documents in memory; only the artifact touches disk
    #[default]
    Memory,
    /// Write each rendered document into the output directory, then merge it
    Directory,
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Path of the JSON jobs file
    #[serde(default = "default_jobs_file")]
    pub jobs_file: String,

    /// Staging and output directory
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File name of the merged artifact inside `output_dir`
    #[serde(default = "default_merged_file_name")]
    pub merged_file_name: String,

    /// Staging mode (memory or directory)
    #[serde(default)]
    pub staging: StagingMode,

    /// Resolve assets only; render and write nothing
    #[serde(default)]
    pub dry_run: bool,

    /// PDF page type (e.g. A4, Letter)
    #[serde(default)]
    pub page_type: Option<String>,

    /// PDF orientation (Portrait or Landscape)
    #[serde(default)]
    pub orientation: Option<String>,

    /// Maximum age in minutes of a cached server-side render
    #[serde(default)]
    pub max_age_minutes: Option<u32>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jobs_file: default_jobs_file(),
            output_dir: default_output_dir(),
            merged_file_name: default_merged_file_name(),
            staging: StagingMode::default(),
            dry_run: false,
            page_type: None,
            orientation: None,
            max_age_minutes: None,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if !self.merged_file_name.to_lowercase().ends_with(".pdf")
            || self.merged_file_name.contains(['/', '\\'])
        {
            return Err(format!(
                "export.merged_file_name '{}' must be a plain file name ending in .pdf",
                self.merged_file_name
            ));
        }

        if let Some(orientation) = &self.orientation {
            let valid = ["portrait", "landscape"];
            if !valid.contains(&orientation.to_lowercase().as_str()) {
                return Err(format!(
                    "Invalid orientation '{orientation}'. Must be one of: Portrait, Landscape"
                ));
            }
        }

        if let Some(page_type) = &self.page_type {
            let valid = [
                "a3", "a4", "a5", "b4", "b5", "executive", "folio", "ledger", "legal", "letter",
                "note", "quarto", "tabloid", "unspecified",
            ];
            if !valid.contains(&page_type.to_lowercase().as_str()) {
                return Err(format!("Invalid page_type '{page_type}'"));
            }
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly or never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_version() -> String {
    "3.11".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_page_size() -> u32 {
    100
}

fn default_jobs_file() -> String {
    "config.json".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_merged_file_name() -> String {
    "merged_pdfs.pdf".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FolioConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.server.api_version, "3.11");
        assert!(config.server.tls_verify);
        assert_eq!(config.export.output_dir, "output");
        assert_eq!(config.export.merged_file_name, "merged_pdfs.pdf");
        assert_eq!(config.export.staging, StagingMode::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_staging_mode_parses_lowercase() {
        let config: FolioConfig = toml::from_str("[export]\nstaging = \"directory\"").unwrap();
        assert_eq!(config.export.staging, StagingMode::Directory);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = FolioConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("log_level"));
    }

    #[test]
    fn test_invalid_server_url() {
        let mut config = FolioConfig::default();
        config.server.url = "tableau.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_server_url_passes_through() {
        let config = FolioConfig::default();
        assert!(config.server.url.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merged_file_name_must_be_plain_pdf() {
        let mut config = FolioConfig::default();
        config.export.merged_file_name = "nested/out.pdf".to_string();
        assert!(config.validate().is_err());

        config.export.merged_file_name = "out.txt".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pdf_options_validation() {
        let mut config = FolioConfig::default();
        config.export.orientation = Some("Landscape".to_string());
        config.export.page_type = Some("Letter".to_string());
        assert!(config.validate().is_ok());

        config.export.orientation = Some("sideways".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = FolioConfig::default();
        config.logging.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }
}
