//! The generated schema tree and its JSON encoding.
//!
//! Every node serializes to exactly the keywords it carries, in a fixed
//! order. Object and array nodes emit their constant keywords (`type`,
//! `additionalProperties`) from the serializer, so a closed object schema
//! cannot be constructed in any other form.

use indexmap::IndexMap;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Value of the JSON Schema `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl JsonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

/// One node of a generated schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Scalar(ScalarNode),
    Enum(EnumNode),
    Object(ObjectNode),
    Array(ArrayNode),
    /// Synthetic `{ items: [...] }` object used when the root type is a collection.
    WrappedArray(ObjectNode),
}

impl SchemaNode {
    pub fn json_type(&self) -> JsonType {
        match self {
            SchemaNode::Scalar(node) => node.ty,
            SchemaNode::Enum(node) => node.ty,
            SchemaNode::Object(_) | SchemaNode::WrappedArray(_) => JsonType::Object,
            SchemaNode::Array(_) => JsonType::Array,
        }
    }

    /// The `description` keyword, for the node kinds that carry one.
    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::Scalar(node) => Some(&node.description),
            SchemaNode::Enum(node) => Some(&node.description),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            SchemaNode::Object(node) | SchemaNode::WrappedArray(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            SchemaNode::Array(node) => Some(node),
            _ => None,
        }
    }

    /// Encode as indented JSON text.
    pub fn to_json_pretty(&self, indent: &str) -> Result<String, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// `{type, description}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarNode {
    #[serde(rename = "type")]
    pub ty: JsonType,
    pub description: String,
}

/// `{type, description, enum}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumNode {
    #[serde(rename = "type")]
    pub ty: JsonType,
    pub description: String,
    #[serde(rename = "enum")]
    pub variants: Vec<String>,
}

/// `{type: "object", properties, required, additionalProperties: false}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: Vec<String>,
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property that must be present.
    pub fn insert_required(&mut self, name: impl Into<String>, node: SchemaNode) {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, node);
    }

    /// Wrap an array in a closed object under a single required `items` key.
    pub fn wrapping(array: ArrayNode) -> Self {
        let mut object = Self::new();
        object.insert_required("items", SchemaNode::Array(array));
        object
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.get(name)
    }
}

impl Serialize for ObjectNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ObjectNode", 4)?;
        state.serialize_field("type", &JsonType::Object)?;
        state.serialize_field("properties", &self.properties)?;
        state.serialize_field("required", &self.required)?;
        state.serialize_field("additionalProperties", &false)?;
        state.end()
    }
}

/// `{type: "array", items}`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub items: Box<SchemaNode>,
}

impl ArrayNode {
    pub fn new(items: SchemaNode) -> Self {
        Self {
            items: Box::new(items),
        }
    }
}

impl Serialize for ArrayNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ArrayNode", 2)?;
        state.serialize_field("type", &JsonType::Array)?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}
