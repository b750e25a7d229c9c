//! Structural validation of documents against embedded JSON schemas
//!
//! Every document shape (CCS input, CP output, station record) carries a
//! draft 7 schema. Validation collects every violation rather than stopping
//! at the first one, and only a document that passes is deserialized into
//! its typed form.

use crate::error::{Error, Result};
use jsonschema::{Draft, Validator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending value in the document ("" for the root)
    pub instance_path: String,
    /// JSON Pointer to the schema rule that rejected it
    pub schema_path: String,
    /// The constraint keyword that failed (e.g. "type", "required")
    pub keyword: String,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {} [{}]", self.message, self.keyword)
        } else {
            write!(f, "{}: {} [{}]", self.instance_path, self.message, self.keyword)
        }
    }
}

/// All violations found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Number of violations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was violated
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the violations in the order they were reported
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Find the first violation at a given instance path
    pub fn at(&self, instance_path: &str) -> Option<&Violation> {
        self.0.iter().find(|v| v.instance_path == instance_path)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}", v)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A document shape that can be validated against its schema and parsed
pub trait SchemaDocument: Serialize + DeserializeOwned {
    /// Name used in error messages
    const SCHEMA_NAME: &'static str;

    /// The JSON schema describing this document
    fn schema() -> Value;

    /// Check a raw value against the schema, reporting every violation
    fn validate(value: &Value) -> Result<()> {
        let validator = build_validator(Self::SCHEMA_NAME, &Self::schema())?;
        let violations = collect_violations(&validator, value);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation {
                schema: Self::SCHEMA_NAME,
                violations,
            })
        }
    }

    /// Validate a raw value and convert it into the typed document
    fn from_value(value: Value) -> Result<Self> {
        Self::validate(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Parse JSON text, validate it and convert it into the typed document
    fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }

    /// Load and validate a document from a JSON file
    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Save the document as pretty-printed JSON
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

fn build_validator(schema_name: &'static str, schema: &Value) -> Result<Validator> {
    let mut opts = jsonschema::options();
    opts.with_draft(Draft::Draft7);
    opts.build(schema).map_err(|e| Error::SchemaBuild {
        schema: schema_name,
        reason: e.to_string(),
    })
}

fn collect_violations(validator: &Validator, value: &Value) -> Violations {
    Violations(
        validator
            .iter_errors(value)
            .map(|e| {
                let schema_path = e.schema_path.to_string();
                let keyword = schema_path
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                Violation {
                    instance_path: e.instance_path.to_string(),
                    schema_path,
                    keyword,
                    message: e.to_string(),
                }
            })
            .collect(),
    )
}
