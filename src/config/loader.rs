//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FolioConfig;
use super::secret::secret_string;
use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FolioConfig
/// 4. Applies environment variable overrides (FOLIO_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use folio::config::loader::load_config;
///
/// let config = load_config("folio.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FolioConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FolioError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FolioError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: FolioConfig = toml::from_str(&contents)
        .map_err(|e| FolioError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        FolioError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads the settings file if it exists, otherwise starts from defaults
///
/// The settings file is optional because every server setting can also be
/// given on the command line. Environment overrides apply either way.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<FolioConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No settings file found, using defaults");
    let mut config = FolioConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        FolioError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| FolioError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Placeholders in comments are left alone
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FolioError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the FOLIO_* prefix
///
/// Environment variables follow the pattern FOLIO_<SECTION>_<KEY>,
/// for example FOLIO_SERVER_URL or FOLIO_EXPORT_OUTPUT_DIR.
fn apply_env_overrides(config: &mut FolioConfig) {
    if let Ok(val) = std::env::var("FOLIO_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Ok(val) = std::env::var("FOLIO_SERVER_URL") {
        config.server.url = val;
    }
    if let Ok(val) = std::env::var("FOLIO_SERVER_SITE") {
        config.server.site = val;
    }
    if let Ok(val) = std::env::var("FOLIO_SERVER_API_VERSION") {
        config.server.api_version = val;
    }
    if let Ok(val) = std::env::var("FOLIO_SERVER_TOKEN_NAME") {
        config.server.token_name = val;
    }
    if let Ok(val) = std::env::var("FOLIO_SERVER_TOKEN_VALUE") {
        config.server.token_value = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("FOLIO_SERVER_TLS_VERIFY") {
        config.server.tls_verify = val.parse().unwrap_or(true);
    }

    // Export overrides
    if let Ok(val) = std::env::var("FOLIO_EXPORT_JOBS_FILE") {
        config.export.jobs_file = val;
    }
    if let Ok(val) = std::env::var("FOLIO_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
}
