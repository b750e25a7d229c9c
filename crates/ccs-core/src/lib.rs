//! ccs-core: Core library for converting Custom Crafting Stations documents
//!
//! This library provides functionality to:
//! - Validate CCS, Content Patcher and station documents against their schemas
//! - Convert authored CCS stations into Better Crafting station records
//! - Wire big craftables to their stations through custom fields
//! - Discover CCS documents in mod folders and convert them in batches

pub mod batch;
pub mod ccs;
pub mod content_patch;
pub mod convert;
pub mod error;
pub mod scanner;
pub mod schema;
pub mod station;

pub use batch::{run_batch, BatchFile, BatchItem, BatchReport};
pub use ccs::{CcsDocument, CraftingStation};
pub use content_patch::{Action, Change, CpDocument, Entries};
pub use convert::{convert, convert_str, convert_value, Conversion};
pub use error::{Error, Result};
pub use scanner::{scan_directory, CcsSource, ScanResult};
pub use schema::{SchemaDocument, Violation, Violations};
pub use station::Station;
