//! Error types for ccs-core

use crate::schema::Violations;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ccs-core
#[derive(Debug, Error)]
pub enum Error {
    /// A document did not match its structural schema
    #[error("document does not match the {schema} schema:\n{violations}")]
    Validation {
        schema: &'static str,
        violations: Violations,
    },

    /// An embedded schema could not be compiled
    #[error("failed to build the {schema} schema: {reason}")]
    SchemaBuild { schema: &'static str, reason: String },

    /// An authored tile identifier contains whitespace
    #[error("station {index}: TileData '{tile_id}' contains whitespace, which is not allowed")]
    WhitespaceInTileId { index: usize, tile_id: String },

    /// Both recipe lists are populated on one station
    #[error("station {index} ('{tile_id}') has both cooking and crafting recipes, which is not supported")]
    AmbiguousRecipes { index: usize, tile_id: String },

    /// Neither recipe list is populated on one station
    #[error("station {index} ('{tile_id}') has no recipes")]
    NoRecipes { index: usize, tile_id: String },

    /// A batch output path is already taken by another file
    #[error("output '{path}' would overwrite '{existing}'")]
    OutputConflict { path: PathBuf, existing: PathBuf },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Itemized violations, if this is a structural validation failure
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Error::Validation { violations, .. } => Some(violations),
            _ => None,
        }
    }
}
