//! Shared fixtures for integration tests
//!
//! PDF fixtures carry one page per requested width; the width goes into the
//! page's MediaBox so tests can read page order back after a merge.

#![allow(dead_code)]

use async_trait::async_trait;
use folio::adapters::tableau::{AnalyticsServer, PdfOptions};
use folio::core::filter::EncodedFilter;
use folio::domain::{AssetId, FolioError, Result, TableauError, View, Workbook};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::Mutex;

/// Build a PDF with one page per entry of `widths`
///
/// Resources live on the page tree root so merges must carry inherited
/// attributes down to each page.
pub fn pdf_with_pages(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for width in widths {
        let content = format!("BT /F1 24 Tf 72 720 Td (page {width}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), (*width).into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => widths.len() as i64,
        "Resources" => resources_id,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Page widths of a PDF, in page order
pub fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let page = doc.get_dictionary(*page_id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

/// Whether every page of a PDF has resources, directly or after inheritance
pub fn every_page_has_resources(bytes: &[u8]) -> bool {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages().values().all(|page_id| {
        let page = doc.get_dictionary(*page_id).unwrap();
        page.has(b"Resources")
    })
}

pub fn workbook(id: &str, name: &str, project: &str, views: &[(&str, &str)]) -> Workbook {
    Workbook::new(AssetId::new(id).unwrap(), name, project).with_views(
        views
            .iter()
            .map(|(view_id, view_name)| View::new(AssetId::new(*view_id).unwrap(), *view_name))
            .collect(),
    )
}

/// One render request received by [`FakeServer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    pub view_id: String,
    pub filters: Vec<(String, String)>,
}

/// In-memory analytics server
///
/// Renders one-page PDFs whose width is `100 + n` for the n-th render call,
/// so the merged artifact reveals the order in which documents were staged.
pub struct FakeServer {
    workbooks: Vec<Workbook>,
    render_body: Option<Vec<u8>>,
    render_failure: Option<String>,
    calls: Mutex<Vec<RenderCall>>,
    authenticated: bool,
}

impl FakeServer {
    pub fn new(workbooks: Vec<Workbook>) -> Self {
        Self {
            workbooks,
            render_body: None,
            render_failure: None,
            calls: Mutex::new(Vec::new()),
            authenticated: true,
        }
    }

    /// Answer every render with these bytes
    pub fn with_render_body(mut self, body: Vec<u8>) -> Self {
        self.render_body = Some(body);
        self
    }

    /// Fail every render with a server error
    pub fn with_render_failure(mut self, message: &str) -> Self {
        self.render_failure = Some(message.to_string());
        self
    }

    pub fn render_calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalyticsServer for FakeServer {
    async fn sign_in(&mut self) -> Result<()> {
        self.authenticated = true;
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }

    async fn list_workbooks(&self, name: &str) -> Result<Vec<Workbook>> {
        Ok(self
            .workbooks
            .iter()
            .filter(|workbook| workbook.name == name)
            .map(|workbook| {
                let mut handle = workbook.clone();
                handle.views.clear();
                handle
            })
            .collect())
    }

    async fn populate_views(&self, workbook: &mut Workbook) -> Result<()> {
        let source = self
            .workbooks
            .iter()
            .find(|candidate| candidate.id == workbook.id)
            .ok_or_else(|| {
                FolioError::Server(TableauError::ClientError {
                    status: 404,
                    message: format!("unknown workbook {}", workbook.id),
                })
            })?;
        workbook.views = source.views.clone();
        Ok(())
    }

    async fn render_view_pdf(
        &self,
        view: &View,
        filters: &[EncodedFilter],
        _options: &PdfOptions,
    ) -> Result<Vec<u8>> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(RenderCall {
            view_id: view.id.to_string(),
            filters: filters
                .iter()
                .map(|f| (f.key.clone(), f.value.clone()))
                .collect(),
        });

        if let Some(message) = &self.render_failure {
            return Err(FolioError::Server(TableauError::ServerError {
                status: 500,
                message: message.clone(),
            }));
        }
        if let Some(body) = &self.render_body {
            return Ok(body.clone());
        }
        Ok(pdf_with_pages(&[100 + calls.len() as i64 - 1]))
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn base_url(&self) -> &str {
        "fake://tableau"
    }
}
