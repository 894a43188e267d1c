//! Integration tests for the export pipeline
//!
//! Runs the coordinator against an in-memory server and checks the merged
//! artifact page by page.

mod common;

use common::{page_widths, workbook, FakeServer, RenderCall};
use folio::adapters::tableau::TableauClient;
use folio::config::{ExportConfig, StagingMode};
use folio::core::export::{ExportCoordinator, JobState};
use folio::core::merge::MERGED_FILE_NAME;
use folio::domain::{ErrorKind, ExportJob, Filter, FolioError};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use test_case::test_case;

fn sales_server() -> FakeServer {
    FakeServer::new(vec![
        workbook(
            "wb-sales",
            "Sales",
            "Finance",
            &[("v-overview", "Overview"), ("v-detail", "Detail")],
        ),
        workbook("wb-sales-mkt", "Sales", "Marketing", &[("v-mkt", "Overview")]),
    ])
}

fn export_config(output_dir: &Path, staging: StagingMode) -> ExportConfig {
    ExportConfig {
        output_dir: output_dir.to_string_lossy().to_string(),
        staging,
        ..Default::default()
    }
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn two_jobs() -> Vec<ExportJob> {
    vec![
        ExportJob::new("Sales", "Finance", "Overview"),
        ExportJob::new("Sales", "Finance", "Overview").with_filter("Region", "East & West"),
    ]
}

#[test_case(StagingMode::Memory ; "memory staging")]
#[test_case(StagingMode::Directory ; "directory staging")]
#[tokio::test]
async fn test_two_jobs_merge_in_declaration_order(staging: StagingMode) {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let coordinator = ExportCoordinator::new(server.clone(), export_config(dir.path(), staging));

    let summary = coordinator.run(&two_jobs()).await.unwrap();

    assert_eq!(
        server.render_calls(),
        vec![
            RenderCall {
                view_id: "v-overview".to_string(),
                filters: vec![],
            },
            RenderCall {
                view_id: "v-overview".to_string(),
                filters: vec![("Region".to_string(), "East %26 West".to_string())],
            },
        ]
    );

    let artifact = dir.path().join(MERGED_FILE_NAME);
    assert_eq!(summary.artifact.as_deref(), Some(artifact.as_path()));
    assert_eq!(coordinator.artifact_path(), artifact);
    assert_eq!(page_widths(&fs::read(&artifact).unwrap()), vec![100, 101]);

    assert_eq!(summary.total_documents, 2);
    assert_eq!(summary.total_pages, 2);
    assert_eq!(summary.checksum.as_ref().map(String::len), Some(64));
    assert!(summary.is_successful());
    assert!(summary.jobs.iter().all(|job| job.state == JobState::Staged));

    // Staging leaves nothing but the artifact behind
    assert_eq!(dir_entries(dir.path()), vec![MERGED_FILE_NAME.to_string()]);
}

#[tokio::test]
async fn test_filter_sets_render_separately_in_order() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let coordinator =
        ExportCoordinator::new(server.clone(), export_config(dir.path(), StagingMode::Memory));

    let jobs = vec![
        ExportJob::new("Sales", "Finance", "Detail")
            .with_filter("Region", "East")
            .with_filter_set(vec![Filter::new("Region", "West"), Filter::new("Year", "2023,2024")]),
        ExportJob::new("Sales", "Marketing", "Overview"),
    ];

    let summary = coordinator.run(&jobs).await.unwrap();

    let calls = server.render_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].filters, vec![("Region".to_string(), "East".to_string())]);
    assert_eq!(
        calls[1].filters,
        vec![
            ("Region".to_string(), "West".to_string()),
            ("Year".to_string(), r"2023\,2024".to_string()),
        ]
    );
    assert_eq!(calls[2].view_id, "v-mkt");

    assert_eq!(summary.jobs[0].documents, 2);
    assert_eq!(summary.jobs[1].documents, 1);
    let artifact = fs::read(dir.path().join(MERGED_FILE_NAME)).unwrap();
    assert_eq!(page_widths(&artifact), vec![100, 101, 102]);
}

#[tokio::test]
async fn test_workbook_in_other_project_is_not_found() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let coordinator =
        ExportCoordinator::new(server.clone(), export_config(dir.path(), StagingMode::Memory));

    let jobs = vec![ExportJob::new("Sales", "Operations", "Overview")];
    let err = coordinator.run(&jobs).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    match &err {
        FolioError::Job { index, workbook, source } => {
            assert_eq!(*index, 0);
            assert_eq!(workbook, "Sales");
            assert!(matches!(**source, FolioError::WorkbookNotFound { .. }));
        }
        other => panic!("expected job error, got {other:?}"),
    }
    assert!(server.render_calls().is_empty());
    assert!(!dir.path().join(MERGED_FILE_NAME).exists());
}

#[tokio::test]
async fn test_missing_view_names_workbook() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let coordinator =
        ExportCoordinator::new(server, export_config(dir.path(), StagingMode::Memory));

    let jobs = vec![ExportJob::new("Sales", "Finance", "Forecast")];
    let err = coordinator.run(&jobs).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    let message = err.to_string();
    assert!(message.contains("Forecast"));
    assert!(message.contains("Sales"));
}

#[test_case(StagingMode::Memory ; "memory staging")]
#[test_case(StagingMode::Directory ; "directory staging")]
#[tokio::test]
async fn test_failing_job_aborts_run_without_artifact(staging: StagingMode) {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let coordinator = ExportCoordinator::new(server.clone(), export_config(dir.path(), staging));

    let jobs = vec![
        ExportJob::new("Sales", "Finance", "Overview"),
        ExportJob::new("Sales", "Finance", "Forecast"),
        ExportJob::new("Sales", "Finance", "Detail"),
    ];
    let err = coordinator.run(&jobs).await.unwrap_err();

    match &err {
        FolioError::Job { index, .. } => assert_eq!(*index, 1),
        other => panic!("expected job error, got {other:?}"),
    }
    // The job after the failure never runs
    assert_eq!(server.render_calls().len(), 1);
    assert!(!dir.path().join(MERGED_FILE_NAME).exists());
    if dir.path().exists() {
        assert!(dir_entries(dir.path()).is_empty());
    }
}

#[tokio::test]
async fn test_render_failure_is_render_error() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server().with_render_failure("backgrounder unavailable"));
    let coordinator =
        ExportCoordinator::new(server, export_config(dir.path(), StagingMode::Memory));

    let err = coordinator.run(&two_jobs()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Render);
    assert!(err.to_string().contains("backgrounder unavailable"));
}

#[tokio::test]
async fn test_non_pdf_response_is_render_error() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server().with_render_body(b"<html>login</html>".to_vec()));
    let coordinator =
        ExportCoordinator::new(server, export_config(dir.path(), StagingMode::Memory));

    let err = coordinator.run(&two_jobs()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Render);
    assert!(err.to_string().contains("not a PDF"));
}

#[tokio::test]
async fn test_dry_run_resolves_without_rendering() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let config = ExportConfig {
        dry_run: true,
        ..export_config(dir.path(), StagingMode::Memory)
    };
    let coordinator = ExportCoordinator::new(server.clone(), config);

    let summary = coordinator.run(&two_jobs()).await.unwrap();

    assert!(summary.dry_run);
    assert!(summary.is_successful());
    assert!(summary.artifact.is_none());
    assert_eq!(summary.total_documents, 0);
    assert!(summary
        .jobs
        .iter()
        .all(|job| job.state == JobState::ResolvingView));
    assert!(server.render_calls().is_empty());
    assert!(!dir.path().join(MERGED_FILE_NAME).exists());
}

#[tokio::test]
async fn test_dry_run_still_reports_missing_assets() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let config = ExportConfig {
        dry_run: true,
        ..export_config(dir.path(), StagingMode::Memory)
    };
    let coordinator = ExportCoordinator::new(server, config);

    let jobs = vec![ExportJob::new("Budget", "Finance", "Overview")];
    let err = coordinator.run(&jobs).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_no_jobs_is_merge_error() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(sales_server());
    let coordinator =
        ExportCoordinator::new(server, export_config(dir.path(), StagingMode::Memory));

    let err = coordinator.run(&[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Merge);
}

#[tokio::test]
async fn test_duplicate_workbook_names_use_first_match() {
    let dir = TempDir::new().unwrap();
    let server = Arc::new(FakeServer::new(vec![
        workbook("wb-first", "Sales", "Finance", &[("v-first", "Overview")]),
        workbook("wb-second", "Sales", "Finance", &[("v-second", "Overview")]),
    ]));
    let coordinator =
        ExportCoordinator::new(server.clone(), export_config(dir.path(), StagingMode::Memory));

    coordinator
        .run(&[ExportJob::new("Sales", "Finance", "Overview")])
        .await
        .unwrap();

    assert_eq!(server.render_calls()[0].view_id, "v-first");
}

#[test_case("9.9_Leftover.pdf" ; "leftover sorting last")]
#[test_case("0.5_Old.pdf" ; "leftover sorting between jobs")]
#[test_case("0.0_Sales.pdf.bak.pdf" ; "leftover sorting before second job")]
#[tokio::test]
async fn test_directory_staging_merges_leftover_documents_after_run(leftover: &str) {
    let dir = TempDir::new().unwrap();
    // A staged document from an earlier, interrupted run
    fs::write(dir.path().join(leftover), common::pdf_with_pages(&[900])).unwrap();
    // A previous artifact is never merged into the new one
    fs::write(dir.path().join(MERGED_FILE_NAME), common::pdf_with_pages(&[999])).unwrap();

    let server = Arc::new(sales_server());
    let coordinator =
        ExportCoordinator::new(server, export_config(dir.path(), StagingMode::Directory));

    let summary = coordinator.run(&two_jobs()).await.unwrap();

    let artifact = fs::read(dir.path().join(MERGED_FILE_NAME)).unwrap();
    assert_eq!(page_widths(&artifact), vec![100, 101, 900]);
    assert_eq!(summary.total_pages, 3);
    assert_eq!(dir_entries(dir.path()), vec![MERGED_FILE_NAME.to_string()]);
}

#[tokio::test]
async fn test_client_wraps_existing_session() {
    let dir = TempDir::new().unwrap();
    let client = TableauClient::from_server(Arc::new(sales_server()));
    assert!(client.is_authenticated());
    assert_eq!(client.base_url(), "fake://tableau");

    let coordinator =
        ExportCoordinator::new(client.server(), export_config(dir.path(), StagingMode::Memory));
    let summary = coordinator.run(&two_jobs()).await.unwrap();
    client.sign_out().await;

    assert_eq!(summary.total_documents, 2);
}
