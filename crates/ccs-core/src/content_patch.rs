//! Content Patcher (CP) output document

use crate::schema::SchemaDocument;
use crate::station::Station;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Format version written into every generated document
pub const CP_FORMAT: &str = "2.0.0";

/// Data asset holding big craftable definitions
pub const BIG_CRAFTABLES_TARGET: &str = "Data/BigCraftables";

/// Sub-field of a big craftable entry that holds custom fields
pub const CUSTOM_FIELDS: &str = "CustomFields";

/// Better Crafting asset holding station definitions
pub const STATIONS_TARGET: &str = "Mods/leclair.bettercrafting/CraftingStations";

/// A content pack: format tag plus ordered edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CpDocument {
    pub format: String,
    pub changes: Vec<Change>,
}

impl CpDocument {
    /// Create an empty document with the current format version
    pub fn new() -> Self {
        Self {
            format: CP_FORMAT.to_string(),
            changes: Vec::new(),
        }
    }

    /// Append an edit
    pub fn add_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Edits that target a given asset, in order
    pub fn changes_for<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a Change> + 'a {
        self.changes.iter().filter(move |c| c.target == target)
    }

    /// Station map carried by the last stations edit, if any
    pub fn stations(&self) -> Option<&BTreeMap<String, Station>> {
        self.changes
            .iter()
            .rev()
            .find(|c| c.target == STATIONS_TARGET)
            .and_then(|c| match &c.entries {
                Some(Entries::Stations(stations)) => Some(stations),
                _ => None,
            })
    }
}

impl Default for CpDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Load,
    EditData,
}

/// A single edit operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", from = "ChangeRepr")]
pub struct Change {
    pub action: Action,
    /// Asset name the edit applies to
    pub target: String,
    /// Path into the asset when only a nested field is edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Entries>,
}

impl Change {
    /// Set one custom field on a big craftable
    pub fn edit_custom_fields(
        object_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(key.into(), value.into());

        Self {
            action: Action::EditData,
            target: BIG_CRAFTABLES_TARGET.to_string(),
            target_field: Some(vec![object_id.into(), CUSTOM_FIELDS.to_string()]),
            entries: Some(Entries::Fields(fields)),
        }
    }

    /// Register a full set of stations
    pub fn edit_stations(stations: BTreeMap<String, Station>) -> Self {
        Self {
            action: Action::EditData,
            target: STATIONS_TARGET.to_string(),
            target_field: None,
            entries: Some(Entries::Stations(stations)),
        }
    }
}

/// Wire form of [`Change`] before the payload is matched to its target
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeRepr {
    action: Action,
    target: String,
    #[serde(default)]
    target_field: Option<Vec<String>>,
    #[serde(default)]
    entries: Option<Entries>,
}

impl From<ChangeRepr> for Change {
    fn from(repr: ChangeRepr) -> Self {
        // An empty map is ambiguous between the two typed payloads; the
        // target decides which one it is.
        let entries = match repr.entries {
            Some(Entries::Stations(map)) if map.is_empty() && repr.target != STATIONS_TARGET => {
                Some(Entries::Fields(BTreeMap::new()))
            }
            other => other,
        };

        Self {
            action: repr.action,
            target: repr.target,
            target_field: repr.target_field,
            entries,
        }
    }
}

/// Payload of an edit
///
/// Generated documents only ever carry the first two shapes; `Other` keeps
/// hand-written content packs loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entries {
    Stations(BTreeMap<String, Station>),
    Fields(BTreeMap<String, String>),
    Other(Value),
}

impl SchemaDocument for CpDocument {
    const SCHEMA_NAME: &'static str = "CP";

    fn schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "CP",
            "type": "object",
            "required": ["Format", "Changes"],
            "properties": {
                "Format": { "type": "string" },
                "Changes": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["Action", "Target"],
                        "properties": {
                            "Action": { "enum": ["Load", "EditData"] },
                            "Target": { "type": "string" },
                            "TargetField": { "type": "array", "items": { "type": "string" } },
                            "Entries": {}
                        }
                    }
                }
            }
        })
    }
}
