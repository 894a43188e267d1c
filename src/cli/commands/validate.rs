//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which checks the
//! settings file and the jobs file without contacting the server.

use crate::config::{load_config_or_default, load_jobs};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Path to the jobs file (defaults to the settings value)
    #[arg(long)]
    pub jobs: Option<String>,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        if !Path::new(config_path).exists() {
            eprintln!("No settings file at {config_path}, using defaults");
        }

        let config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration is invalid");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        let jobs_file = self.jobs.as_deref().unwrap_or(&config.export.jobs_file);
        let jobs = match load_jobs(jobs_file) {
            Ok(jobs) => jobs,
            Err(e) => {
                eprintln!("Jobs file is invalid");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Server: {}",
            if config.server.url.is_empty() {
                "(not set)"
            } else {
                config.server.url.as_str()
            }
        );
        println!("  Site: {}", config.server.site);
        println!("  API Version: {}", config.server.api_version);
        println!("  Output: {}/{}", config.export.output_dir, config.export.merged_file_name);
        println!("  Staging: {:?}", config.export.staging);
        println!("  Jobs ({}):", jobs_file);
        for (index, job) in jobs.iter().enumerate() {
            println!(
                "    [{index}] {} / {} / {} ({} filter-set(s))",
                job.project,
                job.workbook,
                job.view,
                job.filter_sets().len()
            );
        }
        Ok(0)
    }
}
