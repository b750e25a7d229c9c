//! Conversion from CCS documents to Content Patcher edits
//!
//! Each authored station becomes one entry in a single Better Crafting
//! stations edit. Stations that name a big craftable also get an edit on
//! that craftable's custom fields so using it in-world opens the station.
//! The stations edit is always appended last.

use crate::ccs::{CcsDocument, CraftingStation};
use crate::content_patch::{Change, CpDocument};
use crate::error::{Error, Result};
use crate::schema::SchemaDocument;
use crate::station::Station;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Custom field key that Better Crafting reads on big craftables
pub const PERFORM_ACTION_KEY: &str = "leclair.bettercrafting_PerformAction";

/// Result of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The generated content pack
    pub document: CpDocument,
    /// True if at least one station key was synthesized and needs renaming
    pub auto_generated: bool,
    /// Station keys supplied by the author, in input order
    pub tile_ids: Vec<String>,
}

/// Key given to a station whose author left out `TileData`
pub fn generated_tile_id(index: usize) -> String {
    format!("Converted_Station_{}_CHANGEME", index)
}

/// Action string that opens the station with the given key
pub fn open_menu_action(tile_id: &str) -> String {
    format!("leclair.bettercrafting_OpenMenu FALSE FALSE {}", tile_id)
}

/// Convert a validated CCS document
///
/// Fails on the first station that breaks a rule; nothing is returned for
/// the stations that were already processed.
pub fn convert(input: &CcsDocument) -> Result<Conversion> {
    debug!(stations = input.station_count(), "converting CCS document");

    let mut document = CpDocument::new();
    let mut stations: BTreeMap<String, Station> = BTreeMap::new();
    let mut tile_ids = Vec::new();
    let mut auto_generated = false;

    for (index, entry) in input.crafting_stations.iter().enumerate() {
        let tile_id = match resolve_tile_id(index, entry)? {
            TileId::Authored(id) => {
                tile_ids.push(id.clone());
                id
            }
            TileId::Generated(id) => {
                warn!(index, tile_id = %id, "station has no TileData, generated a placeholder key");
                auto_generated = true;
                id
            }
        };

        let (is_cooking, recipes) = resolve_recipes(index, &tile_id, entry)?;

        let mut station = Station::new(tile_id.clone(), is_cooking, recipes.to_vec());
        station.are_recipes_exclusive = entry.exclusive_recipes;

        if let Some(object_id) = entry.big_craftable.as_deref().filter(|s| !s.is_empty()) {
            debug!(index, object_id, tile_id = %tile_id, "wiring big craftable to station");
            document.add_change(Change::edit_custom_fields(
                object_id,
                PERFORM_ACTION_KEY,
                open_menu_action(&tile_id),
            ));
        }

        // Later stations with the same key replace earlier ones.
        if stations.insert(tile_id.clone(), station).is_some() {
            debug!(index, tile_id = %tile_id, "station key reused, replacing earlier station");
        }
    }

    document.add_change(Change::edit_stations(stations));

    Ok(Conversion {
        document,
        auto_generated,
        tile_ids,
    })
}

/// Validate a raw value as a CCS document and convert it
pub fn convert_value(value: Value) -> Result<Conversion> {
    let input = CcsDocument::from_value(value)?;
    convert(&input)
}

/// Parse, validate and convert CCS JSON text
pub fn convert_str(s: &str) -> Result<Conversion> {
    let input = CcsDocument::from_json_str(s)?;
    convert(&input)
}

enum TileId {
    Authored(String),
    Generated(String),
}

fn resolve_tile_id(index: usize, entry: &CraftingStation) -> Result<TileId> {
    match entry.tile_data.as_deref() {
        Some(id) if !id.is_empty() => {
            if id.chars().any(char::is_whitespace) {
                return Err(Error::WhitespaceInTileId {
                    index,
                    tile_id: id.to_string(),
                });
            }
            Ok(TileId::Authored(id.to_string()))
        }
        _ => Ok(TileId::Generated(generated_tile_id(index))),
    }
}

fn resolve_recipes<'a>(
    index: usize,
    tile_id: &str,
    entry: &'a CraftingStation,
) -> Result<(bool, &'a [String])> {
    match (entry.cooking(), entry.crafting()) {
        ([], []) => Err(Error::NoRecipes {
            index,
            tile_id: tile_id.to_string(),
        }),
        (cooking, []) => Ok((true, cooking)),
        ([], crafting) => Ok((false, crafting)),
        (_, _) => Err(Error::AmbiguousRecipes {
            index,
            tile_id: tile_id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_patch::{Action, Entries, BIG_CRAFTABLES_TARGET, STATIONS_TARGET};
    use serde_json::json;

    fn station(tile: Option<&str>, crafting: &[&str], cooking: &[&str]) -> CraftingStation {
        let list = |items: &[&str]| -> Option<Vec<String>> {
            if items.is_empty() {
                None
            } else {
                Some(items.iter().map(|s| s.to_string()).collect())
            }
        };
        CraftingStation {
            tile_data: tile.map(String::from),
            crafting_recipes: list(crafting),
            cooking_recipes: list(cooking),
            ..Default::default()
        }
    }

    fn doc(stations: Vec<CraftingStation>) -> CcsDocument {
        CcsDocument {
            crafting_stations: stations,
        }
    }

    #[test]
    fn test_single_crafting_station() {
        let result = convert_value(json!({
            "CraftingStations": [ { "TileData": "forge", "CraftingRecipes": ["iron_sword"] } ]
        }))
        .unwrap();

        assert!(!result.auto_generated);
        assert_eq!(result.tile_ids, vec!["forge"]);
        assert_eq!(result.document.changes.len(), 1);

        let value = serde_json::to_value(&result.document).unwrap();
        assert_eq!(
            value,
            json!({
                "Format": "2.0.0",
                "Changes": [
                    {
                        "Action": "EditData",
                        "Target": "Mods/leclair.bettercrafting/CraftingStations",
                        "Entries": {
                            "forge": { "Id": "forge", "IsCooking": false, "Recipes": ["iron_sword"] }
                        }
                    }
                ]
            })
        );
    }

    #[test]
    fn test_big_craftable_is_wired_to_station() {
        let result = convert_value(json!({
            "CraftingStations": [
                { "BigCraftable": "210", "TileData": "stove", "CookingRecipes": ["soup"] }
            ]
        }))
        .unwrap();

        let changes = &result.document.changes;
        assert_eq!(changes.len(), 2);

        let wiring = &changes[0];
        assert_eq!(wiring.action, Action::EditData);
        assert_eq!(wiring.target, BIG_CRAFTABLES_TARGET);
        assert_eq!(
            wiring.target_field,
            Some(vec!["210".to_string(), "CustomFields".to_string()])
        );
        match &wiring.entries {
            Some(Entries::Fields(fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(
                    fields.get(PERFORM_ACTION_KEY).map(String::as_str),
                    Some("leclair.bettercrafting_OpenMenu FALSE FALSE stove")
                );
            }
            other => panic!("expected custom fields, got {other:?}"),
        }

        let stove = &result.document.stations().unwrap()["stove"];
        assert!(stove.is_cooking);
        assert_eq!(stove.recipes, vec!["soup"]);
    }

    #[test]
    fn test_missing_tile_data_is_generated() {
        let result = convert(&doc(vec![
            station(Some("forge"), &["a"], &[]),
            station(None, &["b"], &[]),
            station(Some(""), &[], &["c"]),
        ]))
        .unwrap();

        assert!(result.auto_generated);
        assert_eq!(result.tile_ids, vec!["forge"]);

        let stations = result.document.stations().unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations["Converted_Station_1_CHANGEME"].id, "Converted_Station_1_CHANGEME");
        assert!(stations["Converted_Station_2_CHANGEME"].is_cooking);
    }

    #[test]
    fn test_generated_id_is_used_for_wiring() {
        let mut entry = station(None, &["a"], &[]);
        entry.big_craftable = Some("(BC)13".to_string());

        let result = convert(&doc(vec![entry])).unwrap();
        match &result.document.changes[0].entries {
            Some(Entries::Fields(fields)) => assert_eq!(
                fields[PERFORM_ACTION_KEY],
                "leclair.bettercrafting_OpenMenu FALSE FALSE Converted_Station_0_CHANGEME"
            ),
            other => panic!("expected custom fields, got {other:?}"),
        }
        assert!(result.tile_ids.is_empty());
    }

    #[test]
    fn test_whitespace_in_tile_data_is_rejected() {
        let err = convert_value(json!({
            "CraftingStations": [
                { "TileData": "forge", "CraftingRecipes": ["a"] },
                { "TileData": "my station", "CraftingRecipes": ["b"] }
            ]
        }))
        .unwrap_err();

        match err {
            Error::WhitespaceInTileId { index, tile_id } => {
                assert_eq!(index, 1);
                assert_eq!(tile_id, "my station");
            }
            other => panic!("expected whitespace error, got {other:?}"),
        }

        let tab = convert(&doc(vec![station(Some("my\tstation"), &["a"], &[])]));
        assert!(matches!(tab, Err(Error::WhitespaceInTileId { .. })));
    }

    #[test]
    fn test_both_recipe_lists_are_rejected() {
        let mut entry = station(Some("forge"), &["a"], &["b"]);
        entry.big_craftable = Some("210".to_string());
        entry.exclusive_recipes = Some(true);

        let err = convert(&doc(vec![entry])).unwrap_err();
        assert!(matches!(err, Error::AmbiguousRecipes { index: 0, .. }));

        let err = convert(&doc(vec![station(None, &["a"], &["b"])])).unwrap_err();
        match err {
            Error::AmbiguousRecipes { tile_id, .. } => {
                assert_eq!(tile_id, "Converted_Station_0_CHANGEME")
            }
            other => panic!("expected ambiguity error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_recipes_is_rejected() {
        let err = convert(&doc(vec![station(Some("forge"), &[], &[])])).unwrap_err();
        assert!(matches!(err, Error::NoRecipes { index: 0, .. }));

        // Empty lists count as missing.
        let err = convert_value(json!({
            "CraftingStations": [ { "TileData": "forge", "CraftingRecipes": [], "CookingRecipes": [] } ]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::NoRecipes { .. }));
    }

    #[test]
    fn test_empty_list_does_not_conflict() {
        let result = convert_value(json!({
            "CraftingStations": [ { "TileData": "pot", "CraftingRecipes": [], "CookingRecipes": ["stew"] } ]
        }))
        .unwrap();

        assert!(result.document.stations().unwrap()["pot"].is_cooking);
    }

    #[test]
    fn test_exclusive_recipes_absence_is_preserved() {
        let mut explicit_false = station(Some("b"), &["x"], &[]);
        explicit_false.exclusive_recipes = Some(false);
        let mut explicit_true = station(Some("c"), &["x"], &[]);
        explicit_true.exclusive_recipes = Some(true);

        let result = convert(&doc(vec![
            station(Some("a"), &["x"], &[]),
            explicit_false,
            explicit_true,
        ]))
        .unwrap();

        let stations = result.document.stations().unwrap();
        assert_eq!(stations["a"].are_recipes_exclusive, None);
        assert_eq!(stations["b"].are_recipes_exclusive, Some(false));
        assert_eq!(stations["c"].are_recipes_exclusive, Some(true));

        let value = serde_json::to_value(&result.document).unwrap();
        let entries = &value["Changes"][0]["Entries"];
        assert!(entries["a"].get("AreRecipesExclusive").is_none());
        assert_eq!(entries["b"]["AreRecipesExclusive"], json!(false));
    }

    #[test]
    fn test_stations_edit_is_always_last() {
        let mut stations = Vec::new();
        for i in 0..5 {
            let mut entry = station(Some(&format!("s{i}")), &["r"], &[]);
            if i % 2 == 0 {
                entry.big_craftable = Some(format!("{}", 200 + i));
            }
            stations.push(entry);
        }

        let result = convert(&doc(stations)).unwrap();
        let changes = &result.document.changes;

        assert_eq!(changes.len(), 3 + 1);
        assert_eq!(changes.last().unwrap().target, STATIONS_TARGET);
        let objects: Vec<&str> = changes[..3]
            .iter()
            .map(|c| c.target_field.as_ref().unwrap()[0].as_str())
            .collect();
        assert_eq!(objects, vec!["200", "202", "204"]);
    }

    #[test]
    fn test_empty_document_produces_only_stations_edit() {
        let result = convert(&CcsDocument::default()).unwrap();

        assert_eq!(result.document.changes.len(), 1);
        assert!(result.document.stations().unwrap().is_empty());
        assert!(!result.auto_generated);
        assert!(result.tile_ids.is_empty());
    }

    #[test]
    fn test_duplicate_tile_ids_last_write_wins() {
        let mut first = station(Some("forge"), &["old"], &[]);
        first.big_craftable = Some("1".to_string());
        let mut second = station(Some("forge"), &[], &["new"]);
        second.big_craftable = Some("2".to_string());

        let result = convert(&doc(vec![first, second])).unwrap();

        assert_eq!(result.tile_ids, vec!["forge", "forge"]);
        assert_eq!(result.document.changes.len(), 3);

        let stations = result.document.stations().unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations["forge"].recipes, vec!["new"]);
        assert!(stations["forge"].is_cooking);
    }

    #[test]
    fn test_empty_big_craftable_is_ignored() {
        let mut entry = station(Some("forge"), &["a"], &[]);
        entry.big_craftable = Some(String::new());

        let result = convert(&doc(vec![entry])).unwrap();
        assert_eq!(result.document.changes.len(), 1);
    }

    #[test]
    fn test_output_passes_its_own_schemas() {
        let result = convert_str(
            r#"{"CraftingStations": [
                {"BigCraftable": "210", "TileData": "stove", "ExclusiveRecipes": true, "CookingRecipes": ["soup"]},
                {"CraftingRecipes": ["hammer"]}
            ]}"#,
        )
        .unwrap();

        let value = serde_json::to_value(&result.document).unwrap();
        let reparsed = CpDocument::from_value(value).unwrap();
        assert_eq!(reparsed, result.document);

        for station in result.document.stations().unwrap().values() {
            Station::validate(&serde_json::to_value(station).unwrap()).unwrap();
        }
    }

    #[test]
    fn test_structural_errors_stop_before_conversion() {
        let err = convert_str(r#"{"CraftingStations": [{"TileData": 1}]}"#).unwrap_err();
        assert!(matches!(err, Error::Validation { schema: "CCS", .. }));
    }
}
