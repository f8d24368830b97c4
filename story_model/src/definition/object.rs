//! World object definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::ids::ObjectId;

/// A placeable object in the investigation scene.
///
/// Only `id` and `starts_visible` matter to progression. Everything else is
/// carried for the spawning side, including any placement keys this crate
/// does not model (`localPosition`, `localScale`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldObjectDefinition {
    #[serde(default)]
    pub id: ObjectId,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub label: String,

    /// Name of the visual recipe used to build the object.
    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub recipe: Option<String>,

    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub mode: Option<String>,

    #[serde(default)]
    pub starts_visible: bool,

    /// Opaque placement data.
    #[serde(flatten)]
    pub placement: BTreeMap<String, Value>,
}

impl WorldObjectDefinition {
    /// Create a hidden object with no placement data.
    pub fn new(id: impl Into<ObjectId>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            recipe: None,
            mode: None,
            starts_visible: false,
            placement: BTreeMap::new(),
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the visual recipe name.
    pub fn with_recipe(mut self, recipe: impl Into<String>) -> Self {
        self.recipe = Some(recipe.into());
        self
    }

    /// Show the object from the start.
    pub fn visible(mut self) -> Self {
        self.starts_visible = true;
        self
    }

    /// Attach a raw placement value under `key`.
    pub fn with_placement(mut self, key: impl Into<String>, value: Value) -> Self {
        self.placement.insert(key.into(), value);
        self
    }

    /// Raw placement value under `key`.
    pub fn placement_value(&self, key: &str) -> Option<&Value> {
        self.placement.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_keys_pass_through() {
        let json = r#"{
            "id": "desk",
            "label": "Writing desk",
            "recipe": "table_small",
            "localPosition": {"x": 0.2, "y": 0.0, "z": -0.4},
            "localYaw": 90.0,
            "startsVisible": true
        }"#;

        let object: WorldObjectDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(object.id, "desk");
        assert!(object.starts_visible);
        assert_eq!(object.recipe.as_deref(), Some("table_small"));
        assert_eq!(object.placement_value("localYaw"), Some(&json!(90.0)));
        assert_eq!(
            object.placement_value("localPosition"),
            Some(&json!({"x": 0.2, "y": 0.0, "z": -0.4}))
        );
        assert!(object.placement_value("id").is_none());
    }

    #[test]
    fn test_builder_defaults_hidden() {
        let object = WorldObjectDefinition::new("vial").with_label("Vial");
        assert!(!object.starts_visible);
        assert!(object.visible().starts_visible);
    }

    #[test]
    fn test_builder_placement_serializes_flat() {
        let object = WorldObjectDefinition::new("frame")
            .with_recipe("painting")
            .with_placement("localYaw", json!(45.0));

        assert_eq!(object.recipe.as_deref(), Some("painting"));
        assert_eq!(object.placement_value("localYaw"), Some(&json!(45.0)));

        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(value["localYaw"], json!(45.0));
        assert_eq!(value["id"], json!("frame"));
    }
}
