//! Domain models and types for Folio.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Declared jobs** ([`ExportJob`], [`FilterSet`], [`Filter`])
//! - **Resolved assets** ([`Workbook`], [`View`]) identified by [`AssetId`]
//! - **Error types** ([`FolioError`], [`TableauError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use folio::domain::ExportJob;
//!
//! let job = ExportJob::new("Sales", "Finance", "Overview")
//!     .with_filter("Region", "East & West");
//!
//! assert_eq!(job.filter_sets().len(), 1);
//! ```

pub mod asset;
pub mod errors;
pub mod ids;
pub mod job;
pub mod result;

// Re-export commonly used types for convenience
pub use asset::{View, Workbook};
pub use errors::{ErrorKind, FolioError, TableauError};
pub use ids::AssetId;
pub use job::{ExportJob, Filter, FilterEntry, FilterSet};
pub use result::Result;
