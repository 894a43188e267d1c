//! Export command implementation
//!
//! This module implements the `export` command: sign in, run every declared
//! job, merge the rendered views and print the artifact path.

use crate::adapters::tableau::TableauClient;
use crate::config::{load_config_or_default, load_jobs, secret_string, FolioConfig, StagingMode};
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the export command
///
/// Absent flags fall back to the settings file.
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Tableau server address, e.g. https://tableau.example.com
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// Site name (content URL); empty for the default site
    #[arg(short = 'S', long)]
    pub site: Option<String>,

    /// Personal access token name
    #[arg(short = 'p', long)]
    pub token_name: Option<String>,

    /// Personal access token value
    #[arg(short = 'v', long)]
    pub token_value: Option<String>,

    /// REST API version
    #[arg(long)]
    pub api_version: Option<String>,

    /// Path to the jobs file
    #[arg(long)]
    pub jobs: Option<String>,

    /// Directory for the merged document
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Stage rendered documents on disk instead of in memory
    #[arg(long)]
    pub stage_to_disk: bool,

    /// Resolve every job against the server without rendering
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let jobs = match load_jobs(&config.export.jobs_file) {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load jobs");
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        let client = match TableauClient::connect(config.server.clone()).await {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect");
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        let coordinator = ExportCoordinator::new(client.server(), config.export.clone());
        let result = coordinator.run(&jobs).await;
        client.sign_out().await;

        match result {
            Ok(summary) => {
                print_summary(&summary);
                if let Some(path) = &summary.artifact {
                    println!("{}", path.display());
                }
                Ok(0)
            }
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(e.exit_code())
            }
        }
    }

    /// Apply command-line values over the loaded settings
    pub fn apply_overrides(&self, config: &mut FolioConfig) {
        if let Some(server) = &self.server {
            config.server.url = server.clone();
        }
        if let Some(site) = &self.site {
            config.server.site = site.clone();
        }
        if let Some(token_name) = &self.token_name {
            config.server.token_name = token_name.clone();
        }
        if let Some(token_value) = &self.token_value {
            config.server.token_value = Some(secret_string(token_value.clone()));
        }
        if let Some(api_version) = &self.api_version {
            config.server.api_version = api_version.clone();
        }
        if let Some(jobs) = &self.jobs {
            config.export.jobs_file = jobs.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
        if self.stage_to_disk {
            config.export.staging = StagingMode::Directory;
        }
        if self.dry_run {
            tracing::info!("Dry run: resolving jobs without rendering");
            config.export.dry_run = true;
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    eprintln!();
    eprintln!("Export Summary:");
    for job in &summary.jobs {
        eprintln!(
            "  [{}] {} / {}: {} ({} document(s))",
            job.index, job.workbook, job.view, job.state, job.documents
        );
    }
    eprintln!("  Documents: {}", summary.total_documents);
    if summary.dry_run {
        eprintln!("  Dry run: nothing rendered");
    } else {
        eprintln!("  Pages: {}", summary.total_pages);
        if let Some(checksum) = &summary.checksum {
            eprintln!("  SHA-256: {checksum}");
        }
    }
    eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    eprintln!();
}
