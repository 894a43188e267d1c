//! Tableau REST API implementation
//!
//! This module implements [`AnalyticsServer`] on top of the Tableau Server /
//! Tableau Cloud REST API, signing in with a personal access token.

use super::{AnalyticsServer, PdfOptions};
use crate::adapters::tableau::models::{
    ErrorResponse, SignInRequest, SignInResponse, ViewsResponse, WorkbooksResponse,
};
use crate::config::ServerConfig;
use crate::core::filter::EncodedFilter;
use crate::domain::{FolioError, Result, TableauError, View, Workbook};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const AUTH_HEADER: &str = "X-Tableau-Auth";

/// Signed-in session state
#[derive(Debug, Clone)]
struct Session {
    token: String,
    site_id: String,
}

/// Tableau REST API session
///
/// # Example
///
/// ```no_run
/// use folio::adapters::tableau::server::{AnalyticsServer, TableauRestServer};
/// use folio::config::ServerConfig;
///
/// # async fn example() -> folio::domain::Result<()> {
/// let config = ServerConfig {
///     url: "https://tableau.example.com".to_string(),
///     ..Default::default()
/// };
/// let mut server = TableauRestServer::new(config)?;
/// server.sign_in().await?;
/// # Ok(())
/// # }
/// ```
pub struct TableauRestServer {
    /// Server address without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Session token and site (if signed in)
    session: Option<Session>,

    /// Connection settings
    config: ServerConfig,
}

impl TableauRestServer {
    /// Create a new, not yet signed in, REST session
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let base_url = config.url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!(
                base_url = %base_url,
                "TLS certificate verification is disabled"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            FolioError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            session: None,
            config,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, self.config.api_version, path)
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(|| {
            FolioError::Server(TableauError::AuthenticationFailed(
                "not signed in".to_string(),
            ))
        })
    }

    fn site_url(&self, path: &str) -> Result<String> {
        let session = self.session()?;
        Ok(self.api_url(&format!("sites/{}/{}", session.site_id, path)))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let session = self.session()?;
        Ok(request.header(AUTH_HEADER, &session.token))
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(map_transport_error)?;
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::send(self.authorized(request.header(ACCEPT, "application/json"))?)
            .await?;
        response.json::<T>().await.map_err(|e| {
            FolioError::Server(TableauError::InvalidResponse(format!(
                "Failed to parse response: {e}"
            )))
        })
    }

    async fn try_sign_in(&self) -> Result<Session> {
        if self.base_url.is_empty() {
            return Err(FolioError::Configuration(
                "server address is not set".to_string(),
            ));
        }

        let body = SignInRequest::personal_access_token(
            &self.config.token_name,
            self.config.token_value.as_ref(),
            &self.config.site,
        );

        let request = self
            .client
            .post(self.api_url("auth/signin"))
            .header(ACCEPT, "application/json")
            .json(&body);

        let response: SignInResponse = Self::send(request).await?.json().await.map_err(|e| {
            FolioError::Server(TableauError::InvalidResponse(format!(
                "Failed to parse sign-in response: {e}"
            )))
        })?;

        let site_id = response.credentials.site.id.ok_or_else(|| {
            FolioError::Server(TableauError::InvalidResponse(
                "sign-in response has no site id".to_string(),
            ))
        })?;

        Ok(Session {
            token: response.credentials.token,
            site_id,
        })
    }
}

#[async_trait]
impl AnalyticsServer for TableauRestServer {
    async fn sign_in(&mut self) -> Result<()> {
        match self.try_sign_in().await {
            Ok(session) => {
                tracing::info!(
                    base_url = %self.base_url,
                    site = %self.config.site,
                    api_version = %self.config.api_version,
                    "Signed in to Tableau server"
                );
                self.session = Some(session);
                Ok(())
            }
            Err(e) => Err(FolioError::Connection(format!(
                "Failed to sign in to '{}': {}",
                self.base_url, e
            ))),
        }
    }

    async fn sign_out(&self) -> Result<()> {
        if self.session.is_none() {
            return Ok(());
        }

        let request = self.authorized(self.client.post(self.api_url("auth/signout")))?;
        Self::send(request).await?;
        tracing::debug!(base_url = %self.base_url, "Signed out of Tableau server");
        Ok(())
    }

    async fn list_workbooks(&self, name: &str) -> Result<Vec<Workbook>> {
        let url = self.site_url("workbooks")?;
        let filter = format!("name:eq:{name}");
        let page_size = self.config.page_size.to_string();
        let mut workbooks = Vec::new();
        let mut page_number: u32 = 1;

        loop {
            let request = self.client.get(&url).query(&[
                ("filter", filter.as_str()),
                ("pageSize", page_size.as_str()),
                ("pageNumber", page_number.to_string().as_str()),
            ]);
            let response: WorkbooksResponse = self.get_json(request).await?;
            let received = response.workbooks.workbook.len();

            for item in response.workbooks.workbook {
                let workbook = item.into_workbook().map_err(|e| {
                    FolioError::Server(TableauError::InvalidResponse(e))
                })?;
                // The server-side filter is not guaranteed to be case-sensitive
                if workbook.name == name {
                    workbooks.push(workbook);
                }
            }

            if received == 0 {
                break;
            }
            let has_more = match &response.pagination {
                Some(pagination) => pagination
                    .has_more_after(page_number, self.config.page_size)
                    .map_err(|e| FolioError::Server(TableauError::InvalidResponse(e)))?,
                None => false,
            };
            if !has_more {
                break;
            }
            page_number += 1;
        }

        tracing::debug!(
            workbook = %name,
            count = workbooks.len(),
            "Listed workbooks by name"
        );
        Ok(workbooks)
    }

    async fn populate_views(&self, workbook: &mut Workbook) -> Result<()> {
        let url = self.site_url(&format!("workbooks/{}/views", workbook.id))?;
        let response: ViewsResponse = self.get_json(self.client.get(&url)).await?;

        workbook.views = response
            .views
            .view
            .into_iter()
            .map(|item| item.into_view())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| FolioError::Server(TableauError::InvalidResponse(e)))?;

        tracing::debug!(
            workbook = %workbook.name,
            views = workbook.views.len(),
            "Populated workbook views"
        );
        Ok(())
    }

    async fn render_view_pdf(
        &self,
        view: &View,
        filters: &[EncodedFilter],
        options: &PdfOptions,
    ) -> Result<Vec<u8>> {
        let mut url = Url::parse(&self.site_url(&format!("views/{}/pdf", view.id))?)
            .map_err(|e| FolioError::Configuration(format!("Invalid server address: {e}")))?;
        let query = render_query(filters, options);
        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        tracing::debug!(view = %view.name, filters = filters.len(), "Requesting PDF render");
        let request = self.authorized(self.client.get(url))?;
        let response = Self::send(request).await?;
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(bytes.to_vec())
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builds the raw query string of a PDF render request
///
/// Filter components are already escaped by the filter encoder and are
/// appended verbatim so `%26` and `\,` reach the server unchanged. An `=` in a
/// filter key is not escaped and leaves the parameter ambiguous.
pub fn render_query(filters: &[EncodedFilter], options: &PdfOptions) -> String {
    let mut params = Vec::new();
    if let Some(page_type) = &options.page_type {
        params.push(format!("type={page_type}"));
    }
    if let Some(orientation) = &options.orientation {
        params.push(format!("orientation={orientation}"));
    }
    if let Some(max_age) = options.max_age_minutes {
        params.push(format!("maxAge={max_age}"));
    }
    for filter in filters {
        params.push(format!(
            "vf_{}={}",
            query_safe(&filter.key),
            query_safe(&filter.value)
        ));
    }
    params.join("&")
}

// '#' would start a fragment and '+' decodes to a space
fn query_safe(component: &str) -> String {
    component.replace('#', "%23").replace('+', "%2B")
}

fn map_transport_error(err: reqwest::Error) -> FolioError {
    if err.is_timeout() {
        FolioError::Server(TableauError::Timeout(err.to_string()))
    } else {
        FolioError::Server(TableauError::ConnectionFailed(err.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = ErrorResponse::message_from_body(&body);
    let error = match status.as_u16() {
        401 => TableauError::AuthenticationFailed(message),
        code if status.is_server_error() => TableauError::ServerError {
            status: code,
            message,
        },
        code => TableauError::ClientError {
            status: code,
            message,
        },
    };
    Err(FolioError::Server(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::encode_all;
    use crate::domain::Filter;

    #[test]
    fn test_render_query_orders_options_then_filters() {
        let filters = vec![
            EncodedFilter {
                key: "Region".to_string(),
                value: "East %26 West".to_string(),
            },
            EncodedFilter {
                key: "Year".to_string(),
                value: r"2023\,2024".to_string(),
            },
        ];
        let options = PdfOptions {
            page_type: Some("A4".to_string()),
            orientation: Some("Landscape".to_string()),
            max_age_minutes: None,
        };

        assert_eq!(
            render_query(&filters, &options),
            r"type=A4&orientation=Landscape&vf_Region=East %26 West&vf_Year=2023\,2024"
        );
    }

    #[test]
    fn test_render_query_empty() {
        assert_eq!(render_query(&[], &PdfOptions::default()), "");
    }

    #[test]
    fn test_render_query_passes_equals_in_key_through() {
        let filters = encode_all(&[Filter::new("a=b", "c")]);
        assert_eq!(render_query(&filters, &PdfOptions::default()), "vf_a=b=c");
    }

    #[test]
    fn test_query_safe_escapes_fragment_and_plus() {
        assert_eq!(query_safe("C#+"), "C%23%2B");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ServerConfig {
            url: "https://tableau.example.com/".to_string(),
            ..Default::default()
        };
        let server = TableauRestServer::new(config).unwrap();
        assert_eq!(server.base_url(), "https://tableau.example.com");
        assert!(!server.is_authenticated());
    }

    #[test]
    fn test_api_url_uses_configured_version() {
        let config = ServerConfig {
            url: "https://tableau.example.com".to_string(),
            api_version: "3.19".to_string(),
            ..Default::default()
        };
        let server = TableauRestServer::new(config).unwrap();
        assert_eq!(
            server.api_url("auth/signin"),
            "https://tableau.example.com/api/3.19/auth/signin"
        );
    }

    #[tokio::test]
    async fn test_sign_in_without_address_is_connection_error() {
        let mut server = TableauRestServer::new(ServerConfig::default()).unwrap();
        let err = server.sign_in().await.unwrap_err();
        assert!(matches!(err, FolioError::Connection(_)));
        assert!(err.to_string().contains("server address is not set"));
    }

    #[tokio::test]
    async fn test_list_workbooks_requires_session() {
        let server = TableauRestServer::new(ServerConfig::default()).unwrap();
        let err = server.list_workbooks("Sales").await.unwrap_err();
        assert!(matches!(
            err,
            FolioError::Server(TableauError::AuthenticationFailed(_))
        ));
    }
}
