//! Normalized Better Crafting station record

use crate::schema::SchemaDocument;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A station as registered with Better Crafting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Station {
    /// Station key (same as the map key it is stored under)
    pub id: String,
    /// Absent means "use the default", which is not the same as `false`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub are_recipes_exclusive: Option<bool>,
    /// Older station files spell this `DisplayUknownRecipes`
    #[serde(
        default,
        alias = "DisplayUknownRecipes",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_unknown_recipes: Option<bool>,
    #[serde(default)]
    pub is_cooking: bool,
    pub recipes: Vec<String>,
}

impl Station {
    /// Create a station with the given recipes
    pub fn new(id: impl Into<String>, is_cooking: bool, recipes: Vec<String>) -> Self {
        Self {
            id: id.into(),
            are_recipes_exclusive: None,
            display_unknown_recipes: None,
            is_cooking,
            recipes,
        }
    }
}

impl SchemaDocument for Station {
    const SCHEMA_NAME: &'static str = "Station";

    fn schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Station",
            "type": "object",
            "required": ["Id", "Recipes"],
            "properties": {
                "Id": { "type": "string" },
                "AreRecipesExclusive": { "type": "boolean" },
                "DisplayUnknownRecipes": { "type": "boolean" },
                "DisplayUknownRecipes": { "type": "boolean" },
                "IsCooking": { "type": "boolean" },
                "Recipes": { "type": "array", "items": { "type": "string" } }
            }
        })
    }
}
