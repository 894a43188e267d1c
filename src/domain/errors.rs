//! Domain error types
//!
//! This module defines the error hierarchy for Folio. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Folio error type
///
/// This is the primary error type used throughout the application.
/// Every pipeline failure is fatal for the run; the variants carry enough
/// context (asset names, job index) to tell which declared job failed.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session establishment failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// No workbook with this name exists in the requested project
    #[error("Workbook '{workbook}' not found in project '{project}'")]
    WorkbookNotFound { workbook: String, project: String },

    /// The resolved workbook has no view with this name
    #[error("View '{view}' not found in workbook '{workbook}'")]
    ViewNotFound { view: String, workbook: String },

    /// Remote rendering of a view failed
    #[error("Failed to render view '{view}': {message}")]
    Render { view: String, message: String },

    /// Merging staged documents failed
    #[error("Merge error: {0}")]
    Merge(String),

    /// Tableau REST API errors
    #[error("Tableau error: {0}")]
    Server(#[from] TableauError),

    /// A declared job failed; wraps the underlying cause
    #[error("Job {index} ({workbook}) failed: {source}")]
    Job {
        index: usize,
        workbook: String,
        #[source]
        source: Box<FolioError>,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Coarse classification of a [`FolioError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Connection,
    NotFound,
    Render,
    Merge,
    Other,
}

impl FolioError {
    /// Wraps an error with the index and workbook name of the job it came from
    pub fn in_job(self, index: usize, workbook: impl Into<String>) -> Self {
        FolioError::Job {
            index,
            workbook: workbook.into(),
            source: Box::new(self),
        }
    }

    /// Classifies the error, looking through job wrappers
    pub fn kind(&self) -> ErrorKind {
        match self {
            FolioError::Configuration(_) | FolioError::Validation(_) => ErrorKind::Configuration,
            FolioError::Connection(_) => ErrorKind::Connection,
            FolioError::WorkbookNotFound { .. } | FolioError::ViewNotFound { .. } => {
                ErrorKind::NotFound
            }
            FolioError::Render { .. } => ErrorKind::Render,
            FolioError::Merge(_) => ErrorKind::Merge,
            FolioError::Job { source, .. } => source.kind(),
            FolioError::Server(TableauError::ConnectionFailed(_))
            | FolioError::Server(TableauError::AuthenticationFailed(_)) => ErrorKind::Connection,
            _ => ErrorKind::Other,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Configuration => 2,
            ErrorKind::Connection => 4,
            _ => 5,
        }
    }
}

/// Tableau REST API errors
///
/// Errors that occur when talking to the analytics server.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum TableauError {
    /// Failed to reach the server
    #[error("Failed to connect to Tableau server: {0}")]
    ConnectionFailed(String),

    /// Sign-in rejected or session token missing
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response body could not be understood
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl From<std::io::Error> for FolioError {
    fn from(err: std::io::Error) -> Self {
        FolioError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for FolioError {
    fn from(err: toml::de::Error) -> Self {
        FolioError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<lopdf::Error> for FolioError {
    fn from(err: lopdf::Error) -> Self {
        FolioError::Merge(err.to_string())
    }
}
