//! Configuration management for Folio.
//!
//! Two inputs drive a run:
//!
//! - the optional **settings file** (`folio.toml`), parsed into [`FolioConfig`]
//! - the **jobs file** (`config.json`), parsed into a list of
//!   [`ExportJob`](crate::domain::ExportJob) by [`load_jobs`]
//!
//! # Example Settings File
//!
//! ```toml
//! [server]
//! url = "https://tableau.example.com"
//! site = "finance"
//! api_version = "3.11"
//! token_name = "folio-export"
//! token_value = "${FOLIO_TOKEN}"
//!
//! [export]
//! jobs_file = "config.json"
//! output_dir = "output"
//! staging = "memory"
//! page_type = "A4"
//! orientation = "Landscape"
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders are substituted when the file is loaded, and
//! `FOLIO_<SECTION>_<KEY>` variables override individual settings.

pub mod jobs;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use jobs::{load_jobs, parse_jobs};
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, ExportConfig, FolioConfig, LoggingConfig, ServerConfig, StagingMode,
};
pub use secret::{secret_string, SecretString, SecretValue};
