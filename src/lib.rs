// Folio - Tableau view PDF exporter
// Copyright (c) 2025 Folio Contributors
// Licensed under the MIT License

//! # Folio - Tableau view PDF exporter
//!
//! Folio renders a declared list of Tableau views, each optionally under one
//! or more filter-sets, and concatenates the results into a single PDF whose
//! page order follows the declaration order.
//!
//! ## Overview
//!
//! - **Resolving** workbooks and views by project and name
//! - **Encoding** filter values so reserved characters survive transport
//! - **Rendering** each (view, filter-set) pair to PDF over the REST API
//! - **Merging** the rendered documents in job order into one artifact
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (filters, resolution, rendering, merge, export)
//! - [`adapters`] - External integrations (Tableau REST API)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Settings and jobs files
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::adapters::tableau::TableauClient;
//! use folio::config::{load_config, load_jobs};
//! use folio::core::export::ExportCoordinator;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("folio.toml")?;
//!     let jobs = load_jobs(&config.export.jobs_file)?;
//!
//!     let client = TableauClient::connect(config.server.clone()).await?;
//!     let coordinator = ExportCoordinator::new(client.server(), config.export.clone());
//!     let result = coordinator.run(&jobs).await;
//!     client.sign_out().await;
//!
//!     let summary = result?;
//!     println!("{}", coordinator.artifact_path().display());
//!     println!("{} pages", summary.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Jobs File
//!
//! ```json
//! [
//!   { "name": "Sales", "project": "Finance", "view": "Overview", "filters": [] },
//!   { "name": "Sales", "project": "Finance", "view": "Overview",
//!     "filters": [["Region", "East & West"]] }
//! ]
//! ```
//!
//! Each element of `filters` is rendered separately. An element may also be a
//! list of pairs that are applied together.
//!
//! ## Error Handling
//!
//! All library errors are [`domain::FolioError`]. Failures inside a job are
//! wrapped with the job's index and workbook name:
//!
//! ```rust
//! use folio::domain::{ErrorKind, FolioError};
//!
//! let err = FolioError::ViewNotFound {
//!     view: "Overview".into(),
//!     workbook: "Sales".into(),
//! }
//! .in_job(1, "Sales");
//!
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! assert!(err.to_string().starts_with("Job 1 (Sales) failed"));
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
