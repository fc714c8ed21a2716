//! Example crate demonstrating typeschema usage.
//!
//! The types below derive `JsonSchema`, which builds their schemas at
//! runtime. `build.rs` extracts the very same types from this file's source
//! and writes their schemas to `OUT_DIR`; the two paths must agree.

use serde::{Deserialize, Serialize};
use typeschema::JsonSchema;

/// A simple 2D point.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[schema(description = "A point on the map")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A person with various field types.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Person {
    #[schema(description = "Display name")]
    pub name: String,
    pub age: u32,
    pub email: Option<String>,
    pub scores: Vec<u32>,
    pub active: bool,
    #[schema(skip)]
    #[serde(skip)]
    pub session_token: Option<String>,
}

/// How a player currently feels.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[schema(description = "Current mood")]
pub enum Mood {
    Calm,
    Alert,
    Panicked,
}

/// Game state containing nested structures.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameState {
    pub player_position: Point,
    pub health: u32,
    pub inventory: Vec<String>,
    #[schema(description = "How the player feels")]
    pub mood: Mood,
    pub party: Vec<Person>,
}

/// Schemas written by `build.rs` from this file's source.
pub mod extracted {
    pub const POINT: &str = include_str!(concat!(env!("OUT_DIR"), "/Point.schema.json"));
    pub const PERSON: &str = include_str!(concat!(env!("OUT_DIR"), "/Person.schema.json"));
    pub const MOOD: &str = include_str!(concat!(env!("OUT_DIR"), "/Mood.schema.json"));
    pub const GAME_STATE: &str =
        include_str!(concat!(env!("OUT_DIR"), "/GameState.schema.json"));
    pub const PERSON_LIST: &str =
        include_str!(concat!(env!("OUT_DIR"), "/PersonList.schema.json"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use typeschema::{schema_for, to_json_pretty, SchemaGenerator, SchemaNode};

    fn value_of<T: typeschema::Describe>() -> serde_json::Value {
        schema_for::<T>().unwrap().to_value().unwrap()
    }

    fn sample_state() -> GameState {
        GameState {
            player_position: Point { x: 10.5, y: 20.3 },
            health: 100,
            inventory: vec!["sword".to_string(), "shield".to_string()],
            mood: Mood::Alert,
            party: vec![Person {
                name: "Alice".to_string(),
                age: 30,
                email: Some("alice@example.com".to_string()),
                scores: vec![100, 95],
                active: true,
                session_token: Some("secret".to_string()),
            }],
        }
    }

    #[test]
    fn test_point_schema() {
        assert_eq!(
            value_of::<Point>(),
            json!({
                "type": "object",
                "properties": {
                    "x": { "type": "number", "description": "" },
                    "y": { "type": "number", "description": "" }
                },
                "required": ["x", "y"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_person_schema() {
        let schema = value_of::<Person>();
        assert_eq!(
            schema["required"],
            json!(["name", "age", "email", "scores", "active"])
        );
        assert_eq!(schema["properties"]["name"]["description"], "Display name");
        assert_eq!(schema["properties"]["email"]["type"], "string");
        assert_eq!(
            schema["properties"]["scores"],
            json!({ "type": "array", "items": { "type": "integer", "description": "" } })
        );
        assert!(schema["properties"].get("session_token").is_none());
    }

    #[test]
    fn test_enum_schema() {
        assert_eq!(
            value_of::<Mood>(),
            json!({
                "type": "string",
                "description": "Current mood",
                "enum": ["Calm", "Alert", "Panicked"]
            })
        );
    }

    #[test]
    fn test_nested_schema() {
        let schema = value_of::<GameState>();
        assert_eq!(schema["properties"]["player_position"], value_of::<Point>());
        assert_eq!(schema["properties"]["party"]["items"], value_of::<Person>());
        assert_eq!(
            schema["properties"]["mood"]["description"],
            "How the player feels"
        );
    }

    #[test]
    fn test_root_list_is_wrapped() {
        let node = schema_for::<Vec<Person>>().unwrap();
        assert!(matches!(node, SchemaNode::WrappedArray(_)));
        assert_eq!(node.to_value().unwrap()["required"], json!(["items"]));
    }

    #[test]
    fn test_serialized_value_matches_required_keys() {
        let value = serde_json::to_value(sample_state()).unwrap();
        let schema = value_of::<GameState>();

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(keys, required);
        assert_eq!(value["mood"], "Alert");
    }

    #[test]
    fn test_derive_registers_dependencies() {
        let mut generator = SchemaGenerator::new();
        generator.register::<GameState>();
        assert_eq!(
            generator.definitions().collect::<Vec<_>>(),
            vec!["GameState", "Person", "Point", "Mood"]
        );
    }

    #[test]
    fn test_derive_matches_source_extraction() {
        assert_eq!(to_json_pretty::<Point>().unwrap(), extracted::POINT);
        assert_eq!(to_json_pretty::<Person>().unwrap(), extracted::PERSON);
        assert_eq!(to_json_pretty::<Mood>().unwrap(), extracted::MOOD);
        assert_eq!(to_json_pretty::<GameState>().unwrap(), extracted::GAME_STATE);
        assert_eq!(to_json_pretty::<Vec<Person>>().unwrap(), extracted::PERSON_LIST);
    }
}
