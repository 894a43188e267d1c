//! Staging of rendered documents
//!
//! Every rendered document carries a [`SequenceNumber`] that fixes its place
//! in the merged artifact. In memory staging the sequence number is the only
//! ordering source; in directory staging it is also encoded into the staged
//! file name so that a case-insensitive sort of the directory reproduces it.
//!
//! Documents a directory run did not stage itself (leftovers of an earlier,
//! interrupted run) are merged after all of the run's own documents.

use crate::core::merge::{self, MergeOutcome};
use crate::domain::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Position of a rendered document within a run
///
/// Orders by job index first, then by filter-set index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNumber {
    pub job: usize,
    pub filter_set: usize,
}

impl SequenceNumber {
    pub fn new(job: usize, filter_set: usize) -> Self {
        Self { job, filter_set }
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.job, self.filter_set)
    }
}

/// Digit widths used to zero-pad staged file names of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceWidths {
    job: usize,
    filter_set: usize,
}

impl SequenceWidths {
    /// Widths for a run of `jobs` jobs whose largest job has `max_filter_sets` filter-sets
    pub fn for_run(jobs: usize, max_filter_sets: usize) -> Self {
        Self {
            job: digits(jobs.saturating_sub(1)),
            filter_set: digits(max_filter_sets.saturating_sub(1)),
        }
    }
}

impl Default for SequenceWidths {
    fn default() -> Self {
        Self {
            job: 1,
            filter_set: 1,
        }
    }
}

fn digits(mut n: usize) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}

/// File name of a staged document: `<job>.<filter_set>_<workbook>.pdf`
///
/// ```
/// use folio::core::export::{staged_file_name, SequenceNumber, SequenceWidths};
///
/// let widths = SequenceWidths::for_run(12, 1);
/// assert_eq!(
///     staged_file_name(SequenceNumber::new(3, 0), "Sales/EMEA", widths),
///     "03.0_Sales_EMEA.pdf"
/// );
/// ```
pub fn staged_file_name(
    sequence: SequenceNumber,
    workbook: &str,
    widths: SequenceWidths,
) -> String {
    format!(
        "{:0jw$}.{:0fw$}_{}.pdf",
        sequence.job,
        sequence.filter_set,
        sanitize_file_stem(workbook),
        jw = widths.job,
        fw = widths.filter_set,
    )
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// A rendered document awaiting merge
#[derive(Debug, Clone)]
pub struct StagedDocument {
    pub sequence: SequenceNumber,
    pub workbook: String,
    pub bytes: Vec<u8>,
}

impl StagedDocument {
    pub fn new(sequence: SequenceNumber, workbook: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            sequence,
            workbook: workbook.into(),
            bytes,
        }
    }
}

enum Backing {
    Memory(BTreeMap<SequenceNumber, StagedDocument>),
    Directory {
        dir: PathBuf,
        widths: SequenceWidths,
        staged: BTreeMap<SequenceNumber, PathBuf>,
    },
}

/// Holds rendered documents until the run is merged
pub struct StagingArea {
    backing: Backing,
}

impl StagingArea {
    /// Keep staged documents in memory
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory(BTreeMap::new()),
        }
    }

    /// Write staged documents into `dir`, named with zero-padded sequence numbers
    pub fn directory(dir: impl Into<PathBuf>, widths: SequenceWidths) -> Self {
        Self {
            backing: Backing::Directory {
                dir: dir.into(),
                widths,
                staged: BTreeMap::new(),
            },
        }
    }

    /// Number of documents staged so far
    pub fn len(&self) -> usize {
        match &self.backing {
            Backing::Memory(documents) => documents.len(),
            Backing::Directory { staged, .. } => staged.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stage a rendered document
    pub fn stage(&mut self, document: StagedDocument) -> Result<()> {
        match &mut self.backing {
            Backing::Memory(documents) => {
                tracing::debug!(
                    sequence = %document.sequence,
                    bytes = document.bytes.len(),
                    "Staged document in memory"
                );
                documents.insert(document.sequence, document);
            }
            Backing::Directory { dir, widths, staged } => {
                fs::create_dir_all(&*dir)?;
                let name = staged_file_name(document.sequence, &document.workbook, *widths);
                let path = dir.join(name);
                fs::write(&path, &document.bytes)?;
                tracing::debug!(
                    sequence = %document.sequence,
                    path = %path.display(),
                    "Staged document on disk"
                );
                staged.insert(document.sequence, path);
            }
        }
        Ok(())
    }

    /// Merge everything staged into `<output_dir>/<file_name>`
    ///
    /// Directory staging merges the staging directory itself, which must be
    /// `output_dir`.
    pub fn finish(self, output_dir: &Path, file_name: &str) -> Result<MergeOutcome> {
        match self.backing {
            Backing::Memory(documents) => {
                let labels: Vec<String> = documents
                    .values()
                    .map(|doc| format!("{} ({})", doc.sequence, doc.workbook))
                    .collect();
                let merged = merge::merge_documents(
                    labels
                        .iter()
                        .zip(documents.values())
                        .map(|(label, doc)| (label.as_str(), doc.bytes.as_slice())),
                )?;

                let path = output_dir.join(file_name);
                let checksum = merge::write_artifact(&path, &merged.bytes)?;
                Ok(MergeOutcome {
                    path,
                    documents: merged.documents,
                    pages: merged.pages,
                    checksum,
                })
            }
            Backing::Directory { dir, staged, .. } => {
                let own: Vec<PathBuf> = staged.into_values().collect();
                let leftovers: Vec<PathBuf> = merge::list_staged_documents(&dir, file_name)?
                    .into_iter()
                    .filter(|path| !own.contains(path))
                    .collect();
                if !leftovers.is_empty() {
                    tracing::warn!(
                        dir = %dir.display(),
                        count = leftovers.len(),
                        "Merging leftover documents after this run's documents"
                    );
                }

                let inputs: Vec<PathBuf> = own.into_iter().chain(leftovers).collect();
                merge::merge_files(&inputs, &dir, file_name)
            }
        }
    }

    /// Drop staged documents of an aborted run
    pub fn discard(self) {
        if let Backing::Directory { staged, .. } = self.backing {
            for path in staged.into_values() {
                if let Err(e) = fs::remove_file(&path) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove staged document"
                    );
                }
            }
        }
    }
}
