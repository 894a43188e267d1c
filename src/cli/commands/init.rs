//! Init command implementation
//!
//! This module implements the `init` command for generating a sample jobs
//! file and, optionally, a sample settings file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the jobs file
    #[arg(short, long, default_value = "config.json")]
    pub output: String,

    /// Also write a settings file at this path
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "folio.toml")]
    pub with_settings: Option<String>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing jobs file");

        let mut targets = vec![(self.output.as_str(), Self::generate_jobs_file())];
        if let Some(settings) = &self.with_settings {
            targets.push((settings.as_str(), Self::generate_settings_file()));
        }

        for (path, _) in &targets {
            if Path::new(path).exists() && !self.force {
                eprintln!("File already exists: {path}");
                eprintln!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        for (path, content) in &targets {
            if let Err(e) = fs::write(path, content) {
                eprintln!("Failed to write {path}");
                eprintln!("   Error: {e}");
                return Ok(5);
            }
            println!("Created {path}");
        }

        eprintln!();
        eprintln!("Next steps:");
        eprintln!("  1. List the views to export in {}", self.output);
        eprintln!("  2. Set FOLIO_SERVER_TOKEN_VALUE (or pass --token-value)");
        eprintln!("  3. Check the setup: folio validate-config");
        eprintln!("  4. Run the export: folio export");
        Ok(0)
    }

    /// Sample jobs file
    fn generate_jobs_file() -> String {
        r#"[
  {
    "name": "Sales",
    "project": "Finance",
    "view": "Overview",
    "filters": []
  },
  {
    "name": "Sales",
    "project": "Finance",
    "view": "Overview",
    "filters": [["Region", "East & West"], ["Region", "North"]]
  },
  {
    "name": "Operations",
    "project": "Finance",
    "view": "Headcount",
    "filters": [[["Region", "North"], ["Year", "2024"]]]
  }
]
"#
        .to_string()
    }

    /// Sample settings file
    fn generate_settings_file() -> String {
        r#"# Folio settings
#
# Command-line flags override these values, and FOLIO_<SECTION>_<KEY>
# environment variables override the file.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[server]
url = "https://tableau.example.com"
# Content URL of the site; empty for the default site
site = ""
api_version = "3.11"
token_name = "folio-export"
token_value = "${FOLIO_TOKEN}"
tls_verify = true
timeout_seconds = 300
page_size = 100

[export]
jobs_file = "config.json"
output_dir = "output"
merged_file_name = "merged_pdfs.pdf"
# memory | directory
staging = "memory"
dry_run = false
# page_type = "A4"
# orientation = "Landscape"
# max_age_minutes = 1

[logging]
local_enabled = false
local_path = "logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
