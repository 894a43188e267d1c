//! Tableau REST API request and response models
//!
//! Only the fields the exporter reads are modelled. The REST API reports
//! pagination counters as strings, so they are parsed on access.

use crate::config::SecretString;
use crate::domain::{AssetId, View, Workbook};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/signin` using a personal access token
#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub credentials: SignInCredentials,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInCredentials {
    pub personal_access_token_name: String,
    pub personal_access_token_secret: String,
    pub site: SiteRef,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content_url: String,
}

impl SignInRequest {
    /// Build a sign-in body; a missing token value is sent as an empty string
    pub fn personal_access_token(
        token_name: &str,
        token_value: Option<&SecretString>,
        site: &str,
    ) -> Self {
        let secret = token_value
            .map(|value| value.expose_secret().as_str().to_string())
            .unwrap_or_default();

        Self {
            credentials: SignInCredentials {
                personal_access_token_name: token_name.to_string(),
                personal_access_token_secret: secret,
                site: SiteRef {
                    id: None,
                    content_url: site.to_string(),
                },
            },
        }
    }
}

/// Response of `POST /auth/signin`
#[derive(Debug, Deserialize)]
pub struct SignInResponse {
    pub credentials: SessionCredentials,
}

#[derive(Debug, Deserialize)]
pub struct SessionCredentials {
    pub token: String,
    pub site: SiteRef,
}

/// Pagination block of list responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: String,
    pub page_size: String,
    pub total_available: String,
}

impl Pagination {
    /// Whether items remain after the first `pages_read` pages of `page_size` items
    ///
    /// Relies only on the server's total; the page counters it echoes back are
    /// not trusted to advance.
    pub fn has_more_after(&self, pages_read: u32, page_size: u32) -> Result<bool, String> {
        let total = self.total_available.parse::<u64>().map_err(|_| {
            format!("invalid totalAvailable '{}' in pagination", self.total_available)
        })?;
        Ok(u64::from(pages_read) * u64::from(page_size) < total)
    }
}

/// Response of `GET /sites/{site}/workbooks`
#[derive(Debug, Deserialize)]
pub struct WorkbooksResponse {
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub workbooks: WorkbookList,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkbookList {
    #[serde(default)]
    pub workbook: Vec<WorkbookItem>,
}

#[derive(Debug, Deserialize)]
pub struct WorkbookItem {
    pub id: String,
    pub name: String,
    pub project: Option<ProjectRef>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectRef {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl WorkbookItem {
    /// Convert into a workbook handle with no views populated
    pub fn into_workbook(self) -> Result<Workbook, String> {
        let id = AssetId::new(self.id)?;
        let (project_name, project_id) = match self.project {
            Some(project) => (project.name, project.id.and_then(|id| AssetId::new(id).ok())),
            None => (String::new(), None),
        };

        let mut workbook = Workbook::new(id, self.name, project_name);
        workbook.project_id = project_id;
        Ok(workbook)
    }
}

/// Response of `GET /sites/{site}/workbooks/{id}/views`
#[derive(Debug, Deserialize)]
pub struct ViewsResponse {
    #[serde(default)]
    pub views: ViewList,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewList {
    #[serde(default)]
    pub view: Vec<ViewItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    pub id: String,
    pub name: String,
    pub content_url: Option<String>,
}

impl ViewItem {
    pub fn into_view(self) -> Result<View, String> {
        let mut view = View::new(AssetId::new(self.id)?, self.name);
        view.content_url = self.content_url;
        Ok(view)
    }
}

/// Error body returned by the REST API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detail: String,
}

impl ErrorResponse {
    /// Best-effort human readable message from an error body
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => format!(
                "{} ({}): {}",
                parsed.error.summary, parsed.error.code, parsed.error.detail
            ),
            Err(_) => body.to_string(),
        }
    }
}
