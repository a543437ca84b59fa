//! Knowledge-base document discovery

use crate::{IndexerError, IndexerResult};
use rustbot_vector_data::hash_content;
use std::path::Path;
use walkdir::WalkDir;

/// Represents a file with its content for indexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    pub hash: String,
}

impl FileContent {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            hash: hash_content(&content),
            content,
        }
    }
}

/// Read every file under `dir` with the given extension, sorted by path
///
/// Files that are not valid UTF-8 are skipped with a warning.
///
/// # Errors
/// Returns `IndexerError::Io` if `dir` cannot be walked
pub fn collect_documents(dir: &Path, extension: &str) -> IndexerResult<Vec<FileContent>> {
    if !dir.is_dir() {
        return Err(IndexerError::Io {
            message: format!("Knowledge base directory not found: {}", dir.display()),
            source: None,
        });
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let message = format!("Failed to walk {}: {e}", dir.display());
            match e.into_io_error() {
                Some(source) => IndexerError::io(message, source),
                None => IndexerError::Io {
                    message,
                    source: None,
                },
            }
        })?;

        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(extension)
        {
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => documents.push(FileContent::new(path.display().to_string(), content)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
        }
    }

    tracing::debug!(dir = %dir.display(), count = documents.len(), "Collected documents");
    Ok(documents)
}
