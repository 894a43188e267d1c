//! Tableau adapter implementation
//!
//! This module provides the integration with Tableau Server and Tableau Cloud:
//! the session trait and its REST implementation, the connection factory, and
//! the REST API models.

pub mod client;
pub mod models;
pub mod server;

pub use client::TableauClient;
pub use server::{AnalyticsServer, PdfOptions, TableauRestServer};
