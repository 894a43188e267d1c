//! Jobs file loading
//!
//! The jobs file is a JSON array of objects:
//!
//! ```json
//! [
//!   { "name": "Sales", "project": "Finance", "view": "Overview", "filters": [] },
//!   { "name": "Sales", "project": "Finance", "view": "Overview",
//!     "filters": [["Region", "East & West"]] }
//! ]
//! ```

use crate::domain::{ExportJob, FolioError, Result};
use std::fs;
use std::path::Path;

/// Loads and validates the declared export jobs
///
/// # Errors
///
/// Fails fast with a configuration error when the file is missing, is not
/// valid JSON, violates the job schema, or declares a job with blank names.
pub fn load_jobs(path: impl AsRef<Path>) -> Result<Vec<ExportJob>> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|e| {
        FolioError::Configuration(format!(
            "Failed to read jobs file {}: {}",
            path.display(),
            e
        ))
    })?;

    let jobs = parse_jobs(&contents).map_err(|e| match e {
        FolioError::Configuration(msg) => {
            FolioError::Configuration(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    tracing::info!(path = %path.display(), count = jobs.len(), "Loaded export jobs");
    Ok(jobs)
}

/// Parses jobs from a JSON string
pub fn parse_jobs(contents: &str) -> Result<Vec<ExportJob>> {
    let jobs: Vec<ExportJob> = serde_json::from_str(contents)
        .map_err(|e| FolioError::Configuration(format!("Failed to parse jobs file: {e}")))?;

    for (index, job) in jobs.iter().enumerate() {
        job.validate()
            .map_err(|e| FolioError::Configuration(format!("Invalid job {index}: {e}")))?;
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_jobs_preserves_order() {
        let jobs = parse_jobs(
            r#"[
                {"name": "B", "project": "P", "view": "V", "filters": []},
                {"name": "A", "project": "P", "view": "V", "filters": [["k", "v"]]}
            ]"#,
        )
        .unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].workbook, "B");
        assert_eq!(jobs[1].workbook, "A");
    }

    #[test]
    fn test_parse_jobs_rejects_object_root() {
        let err = parse_jobs(r#"{"name": "A"}"#).unwrap_err();
        assert!(matches!(err, FolioError::Configuration(_)));
    }

    #[test]
    fn test_parse_jobs_rejects_missing_field() {
        let err = parse_jobs(r#"[{"name": "A", "project": "P"}]"#).unwrap_err();
        assert!(err.to_string().contains("view"));
    }

    #[test]
    fn test_parse_jobs_rejects_blank_name() {
        let err = parse_jobs(r#"[{"name": " ", "project": "P", "view": "V"}]"#).unwrap_err();
        assert!(err.to_string().contains("Invalid job 0"));
    }

    #[test]
    fn test_load_jobs_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"name": "Sales", "project": "Finance", "view": "Overview"}]"#)
            .unwrap();
        file.flush().unwrap();

        let jobs = load_jobs(file.path()).unwrap();
        assert_eq!(jobs[0].project, "Finance");
    }

    #[test]
    fn test_load_jobs_missing_file() {
        let err = load_jobs("/no/such/config.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read jobs file"));
    }
}
