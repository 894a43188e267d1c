//! Analytics server trait definition
//!
//! This module defines the `AnalyticsServer` trait, the capability set the
//! export pipeline needs from a business-intelligence server: sign in, look up
//! workbooks and their views, and render a view to PDF with filters. The wire
//! protocol stays behind the trait.

use crate::core::filter::EncodedFilter;
use crate::domain::{Result, View, Workbook};
use async_trait::async_trait;

/// Page layout options for a PDF render request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfOptions {
    /// Page type (e.g. A4, Letter)
    pub page_type: Option<String>,

    /// Portrait or Landscape
    pub orientation: Option<String>,

    /// Accept a cached render up to this many minutes old
    pub max_age_minutes: Option<u32>,
}

/// Trait for analytics server sessions
///
/// A signed-in implementation owns every [`Workbook`] and [`View`] handle it
/// returns; handles are only valid for the lifetime of the session.
///
/// # Example
///
/// ```no_run
/// use folio::adapters::tableau::server::{AnalyticsServer, PdfOptions, TableauRestServer};
/// use folio::config::ServerConfig;
///
/// # async fn example() -> folio::domain::Result<()> {
/// let mut server = TableauRestServer::new(ServerConfig::default())?;
/// server.sign_in().await?;
///
/// let mut workbooks = server.list_workbooks("Sales").await?;
/// let mut workbook = workbooks.remove(0);
/// server.populate_views(&mut workbook).await?;
///
/// let pdf = server
///     .render_view_pdf(&workbook.views[0], &[], &PdfOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait AnalyticsServer: Send + Sync {
    /// Establish a session with the server
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Connection`](crate::domain::FolioError::Connection)
    /// when the server cannot be reached or rejects the credentials.
    async fn sign_in(&mut self) -> Result<()>;

    /// End the session; handles issued by it become invalid
    async fn sign_out(&self) -> Result<()>;

    /// List every workbook visible to the session whose name equals `name`
    ///
    /// The match is exact and case-sensitive. Results are returned in server
    /// order across all pages.
    async fn list_workbooks(&self, name: &str) -> Result<Vec<Workbook>>;

    /// Fill in the child views of a workbook
    async fn populate_views(&self, workbook: &mut Workbook) -> Result<()>;

    /// Render a view to PDF bytes
    ///
    /// Each filter becomes one view-filter parameter, in the order given.
    /// An empty filter slice requests an unfiltered render.
    async fn render_view_pdf(
        &self,
        view: &View,
        filters: &[EncodedFilter],
        options: &PdfOptions,
    ) -> Result<Vec<u8>>;

    /// Check if the session is signed in
    fn is_authenticated(&self) -> bool;

    /// Get the base URL of the server
    fn base_url(&self) -> &str;
}
