//! Directory scanner for discovering CCS documents inside mod folders

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Top-level key that marks a JSON file as a CCS document
const CCS_ROOT_KEY: &str = "CraftingStations";

/// A CCS document found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcsSource {
    /// Full path to the file
    pub path: PathBuf,
    /// Root directory the file was found under
    pub root: PathBuf,
}

impl CcsSource {
    /// Path of the file relative to the root it was found under
    pub fn relative_path(&self) -> &Path {
        self.path.strip_prefix(&self.root).unwrap_or(&self.path)
    }
}

/// Result of scanning directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Discovered CCS documents, sorted by path
    pub documents: Vec<CcsSource>,
    /// Total number of JSON files looked at
    pub total_files: usize,
}

impl ScanResult {
    /// Find a document by path
    pub fn find_document(&self, path: &Path) -> Option<&CcsSource> {
        self.documents.iter().find(|d| d.path == path)
    }
}

/// Scan one or more directories for CCS documents
pub fn scan_directory<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult> {
    let mut documents = Vec::new();
    let mut total_files = 0;

    for root in roots {
        let root = root.as_ref();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                // A missing or unreadable root is an error, anything below it is skipped
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();

            if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            total_files += 1;

            if is_ccs_document(path) {
                documents.push(CcsSource {
                    path: path.to_path_buf(),
                    root: root.to_path_buf(),
                });
            }
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(found = documents.len(), total_files, "scan complete");

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        documents,
        total_files,
    })
}

/// Check whether a file parses as JSON with a `CraftingStations` key
fn is_ccs_document(path: &Path) -> bool {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable file");
            return false;
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map.contains_key(CCS_ROOT_KEY),
        Ok(_) => false,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping file that is not plain JSON");
            false
        }
    }
}
