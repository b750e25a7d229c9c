//! Custom Crafting Stations (CCS) authored document

use crate::schema::SchemaDocument;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A CCS document as written by a mod author
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CcsDocument {
    /// Authored station entries, in file order
    pub crafting_stations: Vec<CraftingStation>,
}

impl CcsDocument {
    /// Number of authored stations
    pub fn station_count(&self) -> usize {
        self.crafting_stations.len()
    }
}

/// One authored station entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CraftingStation {
    /// Big craftable that should open this station when used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_craftable: Option<String>,
    /// Stable station key; must not contain whitespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_recipes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crafting_recipes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_recipes: Option<Vec<String>>,
}

impl CraftingStation {
    /// Crafting recipes, if any were given
    pub fn crafting(&self) -> &[String] {
        self.crafting_recipes.as_deref().unwrap_or_default()
    }

    /// Cooking recipes, if any were given
    pub fn cooking(&self) -> &[String] {
        self.cooking_recipes.as_deref().unwrap_or_default()
    }
}

impl SchemaDocument for CcsDocument {
    const SCHEMA_NAME: &'static str = "CCS";

    fn schema() -> Value {
        let string_list = json!({ "type": "array", "items": { "type": "string" } });

        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "CCS",
            "type": "object",
            "required": ["CraftingStations"],
            "properties": {
                "CraftingStations": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "BigCraftable": { "type": "string" },
                            "TileData": { "type": "string" },
                            "ExclusiveRecipes": { "type": "boolean" },
                            "CraftingRecipes": string_list.clone(),
                            "CookingRecipes": string_list
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_minimal_document() {
        let doc = CcsDocument::from_value(json!({
            "CraftingStations": [
                { "TileData": "forge", "CraftingRecipes": ["iron_sword"] }
            ]
        }))
        .unwrap();

        assert_eq!(doc.station_count(), 1);
        let station = &doc.crafting_stations[0];
        assert_eq!(station.tile_data.as_deref(), Some("forge"));
        assert_eq!(station.crafting(), ["iron_sword".to_string()]);
        assert!(station.cooking().is_empty());
        assert_eq!(station.exclusive_recipes, None);
    }

    #[test]
    fn test_empty_station_list_is_valid() {
        let doc = CcsDocument::from_value(json!({ "CraftingStations": [] })).unwrap();
        assert_eq!(doc.station_count(), 0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc = CcsDocument::from_value(json!({
            "CraftingStations": [
                { "TileData": "forge", "CraftingRecipes": ["a"], "DisplayName": "Forge" }
            ],
            "Extra": true
        }))
        .unwrap();
        assert_eq!(doc.station_count(), 1);
    }

    #[test]
    fn test_missing_root_field_is_reported() {
        let err = CcsDocument::from_value(json!({})).unwrap_err();
        let violations = err.violations().unwrap();

        assert_eq!(violations.len(), 1);
        let v = violations.at("").unwrap();
        assert_eq!(v.keyword, "required");
        assert!(v.message.contains("CraftingStations"));
    }

    #[test]
    fn test_every_violation_is_itemized() {
        let err = CcsDocument::from_value(json!({
            "CraftingStations": [
                { "TileData": 5, "CraftingRecipes": ["ok"] },
                { "ExclusiveRecipes": "yes", "CookingRecipes": [1] }
            ]
        }))
        .unwrap_err();

        let violations = match &err {
            Error::Validation { schema, violations } => {
                assert_eq!(*schema, "CCS");
                violations
            }
            other => panic!("expected validation error, got {other:?}"),
        };

        assert_eq!(violations.len(), 3);
        assert_eq!(violations.at("/CraftingStations/0/TileData").unwrap().keyword, "type");
        assert_eq!(
            violations.at("/CraftingStations/1/ExclusiveRecipes").unwrap().keyword,
            "type"
        );
        assert!(violations.at("/CraftingStations/1/CookingRecipes/0").is_some());
    }

    #[test]
    fn test_null_is_not_absent() {
        let err = CcsDocument::from_value(json!({
            "CraftingStations": [ { "TileData": null, "CraftingRecipes": ["a"] } ]
        }))
        .unwrap_err();
        assert!(err.violations().unwrap().at("/CraftingStations/0/TileData").is_some());
    }

    #[test]
    fn test_wrong_root_type() {
        let err = CcsDocument::from_value(json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err.violations().unwrap().at("").unwrap().keyword, "type");
    }

    #[test]
    fn test_revalidating_a_valid_document_never_fails() {
        let doc = CcsDocument::from_value(json!({
            "CraftingStations": [
                {
                    "BigCraftable": "210",
                    "TileData": "stove",
                    "ExclusiveRecipes": false,
                    "CookingRecipes": ["soup"]
                }
            ]
        }))
        .unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        CcsDocument::validate(&value).unwrap();
        let again = CcsDocument::from_value(value).unwrap();
        assert_eq!(again, doc);
    }
}
