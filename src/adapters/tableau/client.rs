//! Tableau client factory
//!
//! `TableauClient` owns a signed-in [`AnalyticsServer`] session and hands out
//! shared read-only access to it for the duration of a run.

use crate::config::ServerConfig;
use crate::domain::Result;
use std::sync::Arc;

use super::server::{AnalyticsServer, TableauRestServer};

/// A signed-in analytics server session
pub struct TableauClient {
    server: Arc<dyn AnalyticsServer>,
}

impl TableauClient {
    /// Connect and sign in using the REST API
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Connection`](crate::domain::FolioError::Connection)
    /// if the session cannot be established. No job runs in that case.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use folio::adapters::tableau::TableauClient;
    /// use folio::config::ServerConfig;
    ///
    /// # async fn example() -> folio::domain::Result<()> {
    /// let client = TableauClient::connect(ServerConfig::default()).await?;
    /// assert!(client.is_authenticated());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(config: ServerConfig) -> Result<Self> {
        let mut server = TableauRestServer::new(config)?;
        server.sign_in().await?;
        Ok(Self {
            server: Arc::new(server),
        })
    }

    /// Wrap an already signed-in session
    pub fn from_server(server: Arc<dyn AnalyticsServer>) -> Self {
        Self { server }
    }

    /// Shared handle to the session
    pub fn server(&self) -> Arc<dyn AnalyticsServer> {
        Arc::clone(&self.server)
    }

    /// Check if the session is signed in
    pub fn is_authenticated(&self) -> bool {
        self.server.is_authenticated()
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        self.server.base_url()
    }

    /// End the session
    ///
    /// A failed sign-out is logged and otherwise ignored: the export outcome
    /// is already decided by then.
    pub async fn sign_out(&self) {
        if let Err(e) = self.server.sign_out().await {
            tracing::warn!(
                base_url = self.server.base_url(),
                error = %e,
                "Failed to sign out of Tableau server"
            );
        }
    }
}
