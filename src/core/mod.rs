//! Core business logic for Folio.
//!
//! # Modules
//!
//! - [`filter`] - Encoding of filter values for transport
//! - [`resolve`] - Resolution of workbook and view names to server assets
//! - [`render`] - Rendering of a view to a PDF document
//! - [`merge`] - Concatenation of rendered documents into one artifact
//! - [`export`] - Orchestration of an export run
//!
//! # Export Workflow
//!
//! 1. **Resolve**: Find the job's workbook in its project, then the view
//! 2. **Encode**: Escape each filter pair of a filter-set
//! 3. **Render**: Fetch the filtered view as PDF
//! 4. **Stage**: Keep the document under its sequence number
//! 5. **Merge**: Concatenate all staged documents in sequence order
//!
//! # Example
//!
//! ```rust,no_run
//! use folio::adapters::tableau::TableauClient;
//! use folio::config::{load_config, load_jobs};
//! use folio::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("folio.toml")?;
//! let jobs = load_jobs(&config.export.jobs_file)?;
//!
//! let client = TableauClient::connect(config.server.clone()).await?;
//! let coordinator = ExportCoordinator::new(client.server(), config.export.clone());
//!
//! let summary = coordinator.run(&jobs).await?;
//! client.sign_out().await;
//!
//! println!("Pages: {}", summary.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod filter;
pub mod merge;
pub mod render;
pub mod resolve;
