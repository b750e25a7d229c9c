//! Batch conversion of every CCS document under a set of directories

use crate::ccs::CcsDocument;
use crate::convert::convert;
use crate::error::{Error, Result};
use crate::scanner::{scan_directory, CcsSource};
use crate::schema::SchemaDocument;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A batch manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFile {
    /// Root directories to scan
    pub roots: Vec<PathBuf>,
    /// Output directory; converted files mirror their layout under the root
    pub output_dir: PathBuf,
}

impl BatchFile {
    /// Load a batch file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the batch file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// One converted document
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Station keys were synthesized and should be renamed by hand
    pub auto_generated: bool,
    pub tile_ids: Vec<String>,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Documents that converted and were written
    pub converted: Vec<BatchItem>,
    /// Documents that failed (source path, error message)
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Number of converted documents that contain generated station keys
    pub fn needs_attention(&self) -> usize {
        self.converted.iter().filter(|i| i.auto_generated).count()
    }
}

/// Convert every CCS document found under the batch roots
///
/// A failing document is recorded in the report and the batch moves on.
/// A document whose output path would replace its own source, or a file
/// already written by this batch, is recorded as a failure and not written.
pub fn run_batch(batch: &BatchFile) -> Result<BatchReport> {
    let scan = scan_directory(&batch.roots)?;
    info!(documents = scan.documents.len(), "running batch conversion");

    let mut report = BatchReport::default();
    // output path -> source that produced it
    let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();

    for source in &scan.documents {
        let output = batch.output_dir.join(source.relative_path());

        let result = match written.get(&output) {
            Some(existing) => Err(Error::OutputConflict {
                path: output,
                existing: existing.clone(),
            }),
            None if output == source.path => Err(Error::OutputConflict {
                path: output,
                existing: source.path.clone(),
            }),
            None => convert_one(source, output),
        };

        match result {
            Ok(item) => {
                written.insert(item.output.clone(), item.source.clone());
                report.converted.push(item);
            }
            Err(e) => {
                warn!(path = %source.path.display(), error = %e, "conversion failed");
                report.errors.push((source.path.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}

fn convert_one(source: &CcsSource, output: PathBuf) -> Result<BatchItem> {
    let input = CcsDocument::load(&source.path)?;
    let conversion = convert(&input)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    conversion.document.save(&output)?;

    Ok(BatchItem {
        source: source.path.clone(),
        output,
        auto_generated: conversion.auto_generated,
        tile_ids: conversion.tile_ids,
    })
}
