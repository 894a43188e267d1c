//! Export orchestration and staging
//!
//! This module provides the export run of Folio, including:
//! - Sequential job orchestration
//! - Staging of rendered documents in memory or on disk
//! - Summary and reporting

pub mod coordinator;
pub mod staging;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use staging::{
    staged_file_name, SequenceNumber, SequenceWidths, StagedDocument, StagingArea,
};
pub use summary::{ExportSummary, JobOutcome, JobState};
