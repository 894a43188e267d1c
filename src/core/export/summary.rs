//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Lifecycle of one export job
///
/// `Staged` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    ResolvingWorkbook,
    ResolvingView,
    Rendering,
    Staged,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Staged | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Pending => "pending",
            JobState::ResolvingWorkbook => "resolving_workbook",
            JobState::ResolvingView => "resolving_view",
            JobState::Rendering => "rendering",
            JobState::Staged => "staged",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a single export job
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Position of the job in the jobs file
    pub index: usize,

    pub workbook: String,
    pub project: String,
    pub view: String,

    /// Current or final state
    pub state: JobState,

    /// State the job was in when it failed
    pub failed_during: Option<JobState>,

    /// Number of documents rendered for this job
    pub documents: usize,
}

impl JobOutcome {
    pub fn new(index: usize, workbook: &str, project: &str, view: &str) -> Self {
        Self {
            index,
            workbook: workbook.to_string(),
            project: project.to_string(),
            view: view.to_string(),
            state: JobState::Pending,
            failed_during: None,
            documents: 0,
        }
    }

    /// Move to the next state, unless already terminal
    pub fn advance(&mut self, state: JobState) {
        if !self.state.is_terminal() {
            tracing::trace!(job = self.index, from = %self.state, to = %state, "Job state change");
            self.state = state;
        }
    }

    /// Mark the job failed, remembering where
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.failed_during = Some(self.state);
            self.state = JobState::Failed;
        }
    }
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Per-job outcomes in job order
    pub jobs: Vec<JobOutcome>,

    /// Total number of rendered documents
    pub total_documents: usize,

    /// Number of pages in the merged artifact
    pub total_pages: usize,

    /// Path of the merged artifact; `None` for a dry run
    pub artifact: Option<PathBuf>,

    /// Hex-encoded SHA-256 of the artifact
    pub checksum: Option<String>,

    /// Duration of the run
    pub duration: Duration,

    /// Whether the run only resolved assets
    pub dry_run: bool,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            jobs: Vec::new(),
            total_documents: 0,
            total_pages: 0,
            artifact: None,
            checksum: None,
            duration: Duration::from_secs(0),
            dry_run,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if every job reached `Staged` (or, for a dry run, did not fail)
    pub fn is_successful(&self) -> bool {
        if self.dry_run {
            return self.jobs.iter().all(|job| job.state != JobState::Failed);
        }
        self.jobs.iter().all(|job| job.state == JobState::Staged)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            jobs = self.jobs.len(),
            documents = self.total_documents,
            pages = self.total_pages,
            artifact = self.artifact.as_ref().map(|p| p.display().to_string()),
            checksum = self.checksum.as_deref(),
            duration_ms = self.duration.as_millis() as u64,
            dry_run = self.dry_run,
            "Export completed"
        );

        for job in &self.jobs {
            tracing::debug!(
                index = job.index,
                workbook = %job.workbook,
                view = %job.view,
                state = %job.state,
                documents = job.documents,
                "Job outcome"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(false);

        assert!(summary.jobs.is_empty());
        assert_eq!(summary.total_documents, 0);
        assert_eq!(summary.total_pages, 0);
        assert!(summary.artifact.is_none());
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(!summary.dry_run);
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new(true).with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
        assert!(summary.dry_run);
    }

    #[test]
    fn test_job_outcome_lifecycle() {
        let mut job = JobOutcome::new(0, "Sales", "Finance", "Overview");
        assert_eq!(job.state, JobState::Pending);

        job.advance(JobState::ResolvingWorkbook);
        job.advance(JobState::ResolvingView);
        job.advance(JobState::Rendering);
        job.fail();

        assert_eq!(job.state, JobState::Failed);
        assert_eq!(job.failed_during, Some(JobState::Rendering));

        // Terminal states stick
        job.advance(JobState::Staged);
        assert_eq!(job.state, JobState::Failed);
    }

    #[test]
    fn test_export_summary_is_successful() {
        let mut summary = ExportSummary::new(false);
        let mut job = JobOutcome::new(0, "Sales", "Finance", "Overview");
        job.advance(JobState::Staged);
        summary.jobs.push(job);
        assert!(summary.is_successful());

        summary.jobs.push(JobOutcome::new(1, "Sales", "Finance", "Overview"));
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_job_state_display() {
        assert_eq!(JobState::ResolvingWorkbook.to_string(), "resolving_workbook");
        assert_eq!(JobState::Staged.to_string(), "staged");
    }
}
