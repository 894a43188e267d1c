//! Analytics server sessions
//!
//! The `AnalyticsServer` trait defines what the export pipeline needs from a
//! server; `TableauRestServer` implements it over the Tableau REST API.

pub mod rest;
mod r#trait;

pub use r#trait::{AnalyticsServer, PdfOptions};
pub use rest::TableauRestServer;
