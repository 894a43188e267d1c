//! Export coordinator - main orchestrator for the export process
//!
//! Jobs run strictly one after another. For each job the workbook and view
//! are resolved once, then every filter-set is encoded, rendered and staged
//! under a [`SequenceNumber`] of `(job index, filter-set index)`. Once every
//! job is staged the staging area is merged into the run's artifact.
//!
//! The first failure aborts the run: nothing is merged and the staged
//! documents of the run are discarded.

use crate::adapters::tableau::AnalyticsServer;
use crate::config::{ExportConfig, StagingMode};
use crate::core::export::staging::{SequenceNumber, SequenceWidths, StagedDocument, StagingArea};
use crate::core::export::summary::{ExportSummary, JobOutcome, JobState};
use crate::core::filter::encode_all;
use crate::core::render::ViewRenderer;
use crate::core::resolve::{resolve_view, resolve_workbook};
use crate::domain::{ExportJob, Result};
use crate::{log_error_with_context, log_job_complete, log_job_start};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    server: Arc<dyn AnalyticsServer>,
    renderer: ViewRenderer,
    config: ExportConfig,
}

impl ExportCoordinator {
    /// Create a coordinator over a signed-in session
    pub fn new(server: Arc<dyn AnalyticsServer>, config: ExportConfig) -> Self {
        let renderer = ViewRenderer::new(
            Arc::clone(&server),
            ViewRenderer::options_from_config(&config),
        );
        Self {
            server,
            renderer,
            config,
        }
    }

    /// Path the merged artifact is written to
    pub fn artifact_path(&self) -> PathBuf {
        Path::new(&self.config.output_dir).join(&self.config.merged_file_name)
    }

    /// Run `jobs` in order and merge their documents into one artifact
    ///
    /// # Errors
    ///
    /// The first failing job aborts the run with
    /// [`FolioError::Job`](crate::domain::FolioError::Job) wrapping the cause.
    /// A run that stages nothing fails with
    /// [`FolioError::Merge`](crate::domain::FolioError::Merge).
    pub async fn run(&self, jobs: &[ExportJob]) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let dry_run = self.config.dry_run;
        let output_dir = PathBuf::from(&self.config.output_dir);
        let mut summary = ExportSummary::new(dry_run);

        tracing::info!(
            jobs = jobs.len(),
            staging = ?self.config.staging,
            output_dir = %output_dir.display(),
            dry_run,
            "Starting export run"
        );

        let mut staging = self.staging_area(jobs, &output_dir);

        for (index, job) in jobs.iter().enumerate() {
            let mut outcome = JobOutcome::new(index, &job.workbook, &job.project, &job.view);

            if let Err(e) = self.run_job(index, job, &mut outcome, &mut staging).await {
                outcome.fail();
                let failed_during = outcome.failed_during.unwrap_or(JobState::Pending);
                let e = e.in_job(index, job.workbook.as_str());
                log_error_with_context!(&e, format!("job {index} failed while {failed_during}"));
                staging.discard();
                return Err(e);
            }

            if !dry_run {
                outcome.advance(JobState::Staged);
            }
            summary.total_documents += outcome.documents;
            summary.jobs.push(outcome);
        }

        if dry_run {
            staging.discard();
            summary = summary.with_duration(start_time.elapsed());
            summary.log_summary();
            return Ok(summary);
        }

        let merged = staging.finish(&output_dir, &self.config.merged_file_name)?;
        summary.total_pages = merged.pages;
        summary.artifact = Some(merged.path);
        summary.checksum = Some(merged.checksum);

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    fn staging_area(&self, jobs: &[ExportJob], output_dir: &Path) -> StagingArea {
        match self.config.staging {
            StagingMode::Memory => StagingArea::in_memory(),
            StagingMode::Directory => {
                let max_filter_sets = jobs
                    .iter()
                    .map(|job| job.filter_sets().len())
                    .max()
                    .unwrap_or(1);
                let widths = SequenceWidths::for_run(jobs.len(), max_filter_sets);
                StagingArea::directory(output_dir, widths)
            }
        }
    }

    async fn run_job(
        &self,
        index: usize,
        job: &ExportJob,
        outcome: &mut JobOutcome,
        staging: &mut StagingArea,
    ) -> Result<()> {
        let started = Instant::now();
        log_job_start!(index, &job.workbook, &job.view);

        outcome.advance(JobState::ResolvingWorkbook);
        let workbook = resolve_workbook(self.server.as_ref(), &job.workbook, &job.project).await?;

        outcome.advance(JobState::ResolvingView);
        let view = resolve_view(&workbook, &job.view)?;

        if self.config.dry_run {
            tracing::info!(
                job = index,
                workbook_id = %workbook.id,
                view_id = %view.id,
                filter_sets = job.filter_sets().len(),
                "Resolved job (dry run, nothing rendered)"
            );
            return Ok(());
        }

        outcome.advance(JobState::Rendering);
        for (filter_set, set) in job.filter_sets().iter().enumerate() {
            let filters = encode_all(set.filters());
            let bytes = self.renderer.render(view, &filters).await?;

            let sequence = SequenceNumber::new(index, filter_set);
            staging.stage(StagedDocument::new(sequence, job.workbook.as_str(), bytes))?;
            outcome.documents += 1;
        }

        log_job_complete!(index, outcome.documents, started.elapsed());
        Ok(())
    }
}
