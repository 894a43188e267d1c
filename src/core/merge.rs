//! PDF merge engine
//!
//! Concatenates the pages of rendered documents, in a given order, into one
//! output document.
//!
//! Three entry points share the same page-level merge:
//!
//! - [`merge_documents`] takes already ordered in-memory buffers
//! - [`merge_files`] merges staged files in the given order next to the inputs
//!   and deletes the inputs once the artifact is safely on disk
//! - [`merge_directory`] scans a staging directory, orders the staged `.pdf`
//!   files by case-insensitive file name and hands them to [`merge_files`]
//!
//! A merge is all-or-nothing: inputs are never removed before the merged
//! artifact has been written and renamed into place.

use crate::domain::{FolioError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name of the merged artifact
pub const MERGED_FILE_NAME: &str = "merged_pdfs.pdf";

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// An in-memory merge result
#[derive(Debug)]
pub struct MergedDocument {
    pub bytes: Vec<u8>,
    pub documents: usize,
    pub pages: usize,
}

/// A merged artifact written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Path of the merged artifact
    pub path: PathBuf,

    /// Number of input documents
    pub documents: usize,

    /// Number of pages in the artifact
    pub pages: usize,

    /// Hex-encoded SHA-256 of the artifact
    pub checksum: String,
}

/// Merge documents in iteration order
///
/// Each item is a label (used in error messages) and the document bytes.
///
/// # Errors
///
/// Returns [`FolioError::Merge`] if there are no documents, a document cannot
/// be parsed, or the inputs contain no pages at all.
pub fn merge_documents<'a, I>(documents: I) -> Result<MergedDocument>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut count = 0;

    for (label, bytes) in documents {
        let mut document = Document::load_mem(bytes)
            .map_err(|e| FolioError::Merge(format!("failed to read document '{label}': {e}")))?;

        document.renumber_objects_with(max_id);
        max_id = document.max_id + 1;

        for page_id in document.get_pages().into_values() {
            let page = page_with_inherited_attributes(&document, page_id).map_err(|e| {
                FolioError::Merge(format!("malformed page tree in '{label}': {e}"))
            })?;
            pages.push((page_id, page));
        }

        objects.extend(document.objects);
        count += 1;
    }

    if count == 0 {
        return Err(FolioError::Merge("no documents to merge".to_string()));
    }
    if pages.is_empty() {
        return Err(FolioError::Merge(format!(
            "{count} document(s) contain no pages"
        )));
    }

    let mut merged = Document::with_version("1.5");
    merged.max_id = max_id;

    // Page tree nodes and outlines are rebuilt; everything else is carried over
    for (id, object) in objects {
        match type_name(&object) {
            Some(b"Catalog") | Some(b"Pages") | Some(b"Page") | Some(b"Outlines")
            | Some(b"Outline") => {}
            _ => {
                merged.objects.insert(id, object);
            }
        }
    }

    let pages_id = merged.new_object_id();
    let page_count = pages.len();
    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();

    for (id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        merged.objects.insert(id, Object::Dictionary(page));
    }

    let mut page_tree = Dictionary::new();
    page_tree.set("Type", Object::Name(b"Pages".to_vec()));
    page_tree.set("Kids", Object::Array(kids));
    page_tree.set("Count", Object::Integer(page_count as i64));
    merged.objects.insert(pages_id, Object::Dictionary(page_tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = merged.add_object(catalog);
    merged.trailer.set("Root", Object::Reference(catalog_id));

    merged.renumber_objects();
    merged.compress();

    let mut bytes = Vec::new();
    merged
        .save_to(&mut bytes)
        .map_err(|e| FolioError::Merge(format!("failed to serialize merged document: {e}")))?;

    Ok(MergedDocument {
        bytes,
        documents: count,
        pages: page_count,
    })
}

/// Merge every staged document of a directory into `<staging_dir>/<output_name>`
///
/// Only files with a `.pdf` extension (any case) take part; a previous
/// artifact named `output_name` is ignored. Staged inputs are deleted after
/// the artifact has been written.
///
/// # Errors
///
/// Returns [`FolioError::Merge`] if the directory holds no staged documents
/// or the merge fails; nothing is deleted in either case.
pub fn merge_directory(staging_dir: &Path, output_name: &str) -> Result<MergeOutcome> {
    let staged = list_staged_documents(staging_dir, output_name)?;
    merge_files(&staged, staging_dir, output_name)
}

/// Merge `inputs`, in the given order, into `<staging_dir>/<output_name>`
///
/// Inputs are deleted once the artifact is on disk; a failed deletion is
/// logged and does not fail the merge.
///
/// # Errors
///
/// Returns [`FolioError::Merge`] if `inputs` is empty, an input cannot be read
/// or the merge fails; nothing is deleted in any of these cases.
pub fn merge_files(
    inputs: &[PathBuf],
    staging_dir: &Path,
    output_name: &str,
) -> Result<MergeOutcome> {
    if inputs.is_empty() {
        return Err(FolioError::Merge(format!(
            "no staged documents found in {}",
            staging_dir.display()
        )));
    }

    let mut buffers = Vec::with_capacity(inputs.len());
    for path in inputs {
        let bytes = fs::read(path).map_err(|e| {
            FolioError::Merge(format!("failed to read {}: {}", path.display(), e))
        })?;
        buffers.push((display_name(path), bytes));
    }

    let merged = merge_documents(
        buffers
            .iter()
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice())),
    )?;

    let path = staging_dir.join(output_name);
    let checksum = write_artifact(&path, &merged.bytes)?;

    for input in inputs {
        if let Err(e) = fs::remove_file(input) {
            tracing::warn!(path = %input.display(), error = %e, "Failed to remove staged document");
        }
    }

    tracing::info!(
        path = %path.display(),
        documents = merged.documents,
        pages = merged.pages,
        "Merged staged documents"
    );

    Ok(MergeOutcome {
        path,
        documents: merged.documents,
        pages: merged.pages,
        checksum,
    })
}

/// Staged documents of a directory in merge order
pub fn list_staged_documents(staging_dir: &Path, output_name: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(staging_dir).map_err(|e| {
        FolioError::Merge(format!(
            "failed to read staging directory {}: {}",
            staging_dir.display(),
            e
        ))
    })?;

    let mut staged = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        let is_artifact = path.file_name().and_then(|n| n.to_str()) == Some(output_name);
        if is_pdf && !is_artifact {
            staged.push(path);
        }
    }

    staged.sort_by_cached_key(|path| {
        let name = display_name(path);
        (name.to_lowercase(), name)
    });
    Ok(staged)
}

/// Write an artifact through a temporary file and return its SHA-256
///
/// The parent directory is created if absent.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    if let Err(e) = fs::write(&partial, bytes).and_then(|_| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(FolioError::Merge(format!(
            "failed to write {}: {}",
            path.display(),
            e
        )));
    }

    Ok(format!("{:x}", Sha256::digest(bytes)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn type_name(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

fn page_with_inherited_attributes(
    document: &Document,
    page_id: ObjectId,
) -> std::result::Result<Dictionary, lopdf::Error> {
    let mut page = document.get_dictionary(page_id)?.clone();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        // Guards against cyclic page trees
        if depth > 64 {
            break;
        }
        let node = document.get_dictionary(parent_id)?;
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(page)
}
