//! View rendering
//!
//! A [`ViewRenderer`] turns a resolved view plus a filter-set into the bytes
//! of one PDF document. Rendering is a single blocking remote call; failures
//! are not retried and surface as [`FolioError::Render`].

use crate::adapters::tableau::{AnalyticsServer, PdfOptions};
use crate::config::ExportConfig;
use crate::core::filter::EncodedFilter;
use crate::domain::{FolioError, Result, View};
use std::sync::Arc;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Renders views of a signed-in session to PDF
pub struct ViewRenderer {
    server: Arc<dyn AnalyticsServer>,
    options: PdfOptions,
}

impl ViewRenderer {
    pub fn new(server: Arc<dyn AnalyticsServer>, options: PdfOptions) -> Self {
        Self { server, options }
    }

    /// Page layout options taken from the export settings
    pub fn options_from_config(config: &ExportConfig) -> PdfOptions {
        PdfOptions {
            page_type: config.page_type.clone(),
            orientation: config.orientation.clone(),
            max_age_minutes: config.max_age_minutes,
        }
    }

    /// Render `view` with `filters` applied in order
    ///
    /// An empty filter slice requests an unfiltered render.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Render`] if the remote call fails or the response
    /// is not a PDF document.
    pub async fn render(&self, view: &View, filters: &[EncodedFilter]) -> Result<Vec<u8>> {
        let bytes = self
            .server
            .render_view_pdf(view, filters, &self.options)
            .await
            .map_err(|e| FolioError::Render {
                view: view.name.clone(),
                message: e.to_string(),
            })?;

        if !bytes.starts_with(PDF_MAGIC) {
            return Err(FolioError::Render {
                view: view.name.clone(),
                message: format!(
                    "response is not a PDF document ({} bytes received)",
                    bytes.len()
                ),
            });
        }

        tracing::debug!(
            view = %view.name,
            filters = filters.len(),
            bytes = bytes.len(),
            "Rendered view"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;

    #[test]
    fn test_options_from_config() {
        let config = ExportConfig {
            page_type: Some("Letter".to_string()),
            max_age_minutes: Some(5),
            ..Default::default()
        };

        let options = ViewRenderer::options_from_config(&config);
        assert_eq!(options.page_type.as_deref(), Some("Letter"));
        assert_eq!(options.orientation, None);
        assert_eq!(options.max_age_minutes, Some(5));
    }
}
