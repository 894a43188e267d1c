//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Folio using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Folio - merge filtered Tableau views into one PDF
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
#[command(author = "Folio Contributors")]
pub struct Cli {
    /// Path to the settings file
    #[arg(short, long, default_value = "folio.toml", env = "FOLIO_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FOLIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the configured views and merge them into one PDF
    Export(commands::export::ExportArgs),

    /// Validate the settings and jobs files
    ValidateConfig(commands::validate::ValidateArgs),

    /// Write a sample jobs file
    Init(commands::init::InitArgs),
}
