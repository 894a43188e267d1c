//! Asset resolution
//!
//! Turns the (project, workbook, view) names of a declared job into handles
//! issued by the signed-in session.
//!
//! Names are matched exactly and case-sensitively. When several assets match
//! (for example equally named workbooks in nested projects that share a leaf
//! name) the first one in server order is used and a warning is logged; the
//! server gives no stronger ordering guarantee.

use crate::adapters::tableau::AnalyticsServer;
use crate::domain::{FolioError, Result, View, Workbook};

/// Resolve a workbook by name within a project and populate its views
///
/// # Errors
///
/// Returns [`FolioError::WorkbookNotFound`] when no workbook with this name
/// is published to `project_name`, even if one exists in another project.
pub async fn resolve_workbook(
    server: &dyn AnalyticsServer,
    workbook_name: &str,
    project_name: &str,
) -> Result<Workbook> {
    let candidates = server.list_workbooks(workbook_name).await?;
    let total = candidates.len();

    let mut matches: Vec<Workbook> = candidates
        .into_iter()
        .filter(|workbook| {
            workbook.name == workbook_name && workbook.project_name == project_name
        })
        .collect();

    if matches.is_empty() {
        tracing::debug!(
            workbook = %workbook_name,
            project = %project_name,
            same_name_elsewhere = total,
            "No workbook in requested project"
        );
        return Err(FolioError::WorkbookNotFound {
            workbook: workbook_name.to_string(),
            project: project_name.to_string(),
        });
    }

    if matches.len() > 1 {
        tracing::warn!(
            workbook = %workbook_name,
            project = %project_name,
            candidates = matches.len(),
            chosen_id = %matches[0].id,
            "Workbook name is ambiguous, using first match in server order"
        );
    }

    let mut workbook = matches.remove(0);
    server.populate_views(&mut workbook).await?;

    tracing::debug!(
        workbook = %workbook.name,
        workbook_id = %workbook.id,
        views = workbook.views.len(),
        "Resolved workbook"
    );
    Ok(workbook)
}

/// Find a view of a resolved workbook by name
///
/// # Errors
///
/// Returns [`FolioError::ViewNotFound`] naming the workbook when no view matches.
pub fn resolve_view<'a>(workbook: &'a Workbook, view_name: &str) -> Result<&'a View> {
    let mut matches = workbook.views.iter().filter(|view| view.name == view_name);

    let view = matches.next().ok_or_else(|| FolioError::ViewNotFound {
        view: view_name.to_string(),
        workbook: workbook.name.clone(),
    })?;

    let duplicates = matches.count();
    if duplicates > 0 {
        tracing::warn!(
            workbook = %workbook.name,
            view = %view_name,
            candidates = duplicates + 1,
            chosen_id = %view.id,
            "View name is ambiguous, using first match"
        );
    }

    Ok(view)
}
