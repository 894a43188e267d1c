//! Resolved report assets
//!
//! A [`Workbook`] and its [`View`]s are handles issued by a signed-in session.
//! They are read-only and only meaningful while that session is alive.

use super::ids::AssetId;
use serde::{Deserialize, Serialize};

/// A single renderable report page within a workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// Server-assigned view ID
    pub id: AssetId,

    /// Display name of the view (sheet or dashboard name)
    pub name: String,

    /// URL fragment of the view, if the server reported one
    #[serde(default)]
    pub content_url: Option<String>,
}

impl View {
    /// Create a new view handle
    pub fn new(id: AssetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            content_url: None,
        }
    }
}

/// A named container of report views, scoped to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    /// Server-assigned workbook ID
    pub id: AssetId,

    /// Display name of the workbook
    pub name: String,

    /// Name of the project the workbook is published to
    pub project_name: String,

    /// ID of the project, if the server reported one
    #[serde(default)]
    pub project_id: Option<AssetId>,

    /// Child views; empty until populated
    #[serde(default)]
    pub views: Vec<View>,
}

impl Workbook {
    /// Create a new workbook handle with no views populated
    pub fn new(id: AssetId, name: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            project_name: project_name.into(),
            project_id: None,
            views: Vec::new(),
        }
    }

    /// Attach views (builder style)
    pub fn with_views(mut self, views: Vec<View>) -> Self {
        self.views = views;
        self
    }
}
