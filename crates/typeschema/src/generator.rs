//! Definition tables and entry points for schema generation.

use crate::describe::Describe;
use crate::error::{CyclicTypeError, SchemaError};
use crate::extractor::ExtractedStruct;
use crate::registry::{TypeMapping, TypeRegistry};
use crate::schema::SchemaNode;
use crate::types::{EnumDef, StructDef, TypeDef};
use std::collections::BTreeMap;

/// Holds the struct and enum definitions that `TypeDef::Named` refers to,
/// and builds schemas from them.
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    /// Struct definitions: name -> definition
    structs: BTreeMap<String, StructDef>,

    /// Enum definitions: name -> definition
    enums: BTreeMap<String, EnumDef>,

    /// Indentation unit for JSON output
    indent: String,

    /// Marker names to look for in derive attributes (default: ["JsonSchema"])
    pub(crate) markers: Vec<String>,

    /// How the source extractor classifies external type paths
    pub(crate) registry: TypeRegistry,

    /// Structs registered by the source extractor, with their syntax
    pub(crate) extracted: Vec<ExtractedStruct>,
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self {
            structs: BTreeMap::new(),
            enums: BTreeMap::new(),
            indent: "  ".to_string(),
            markers: vec!["JsonSchema".to_string()],
            registry: TypeRegistry::with_builtins(),
            extracted: Vec::new(),
        }
    }
}

impl SchemaGenerator {
    /// Create a new generator with empty definition tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation unit used by [`to_json_string`](Self::to_json_string).
    pub fn set_indent(&mut self, indent: impl Into<String>) -> &mut Self {
        self.indent = indent.into();
        self
    }

    /// Add a marker name to look for in derive attributes.
    ///
    /// By default, the extractor looks for `JsonSchema` (matching any path
    /// ending with `JsonSchema`, such as `typeschema::JsonSchema`).
    ///
    /// ```rust,ignore
    /// // If your code uses: `use typeschema::JsonSchema as Schema;`
    /// generator.add_marker("Schema");
    /// ```
    pub fn add_marker(&mut self, marker: impl Into<String>) -> &mut Self {
        self.markers.push(marker.into());
        self
    }

    /// Set the marker names to look for, replacing the defaults.
    pub fn set_markers(&mut self, markers: &[impl AsRef<str>]) -> &mut Self {
        self.markers = markers.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Teach the source extractor how to classify an external type path.
    ///
    /// ```
    /// use typeschema::{SchemaGenerator, TypeDef, TypeMapping};
    ///
    /// let mut generator = SchemaGenerator::new();
    /// generator.register_type("money::Money", TypeMapping::Fixed(TypeDef::Decimal));
    /// ```
    pub fn register_type(&mut self, path: impl Into<String>, mapping: TypeMapping) -> &mut Self {
        self.registry.register(path, mapping);
        self
    }

    /// Add a struct definition, replacing any definition with the same name.
    ///
    /// # Example
    ///
    /// ```
    /// use typeschema::{FieldDef, SchemaGenerator, StructDef, TypeDef};
    ///
    /// let mut generator = SchemaGenerator::new();
    /// generator.add_struct(
    ///     StructDef::new("Point")
    ///         .field(FieldDef::new("x", TypeDef::F64))
    ///         .field(FieldDef::new("y", TypeDef::F64)),
    /// );
    /// ```
    pub fn add_struct(&mut self, def: StructDef) -> &mut Self {
        self.enums.remove(&def.name);
        self.structs.insert(def.name.clone(), def);
        self
    }

    /// Add an enum definition, replacing any definition with the same name.
    ///
    /// # Example
    ///
    /// ```
    /// use typeschema::{EnumDef, SchemaGenerator};
    ///
    /// let mut generator = SchemaGenerator::new();
    /// generator.add_enum(EnumDef::new("Status", &["Pending", "Active"]));
    /// ```
    pub fn add_enum(&mut self, def: EnumDef) -> &mut Self {
        self.structs.remove(&def.name);
        self.enums.insert(def.name.clone(), def);
        self
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.structs.contains_key(name) || self.enums.contains_key(name)
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// Names of every registered definition, structs first.
    pub fn definitions(&self) -> impl Iterator<Item = &str> {
        self.structs
            .keys()
            .chain(self.enums.keys())
            .map(String::as_str)
    }

    /// Register `T` and every type it reaches.
    pub fn register<T: Describe + ?Sized>(&mut self) -> &mut Self {
        T::define(self);
        self
    }

    /// Register `T` and build its schema.
    pub fn schema_for<T: Describe + ?Sized>(&mut self) -> Result<SchemaNode, CyclicTypeError> {
        self.register::<T>();
        self.build(&T::type_def())
    }

    /// Encode a schema as indented JSON text.
    pub fn to_json_string(&self, node: &SchemaNode) -> Result<String, SchemaError> {
        Ok(node.to_json_pretty(&self.indent)?)
    }

    /// Build the schema for `ty` and encode it.
    pub fn generate(&self, ty: &TypeDef) -> Result<String, SchemaError> {
        let node = self.build(ty)?;
        self.to_json_string(&node)
    }
}

/// Build the schema for `T` with a fresh generator.
///
/// ```
/// use typeschema::{schema_for, JsonType};
///
/// let node = schema_for::<Vec<u32>>().unwrap();
/// assert_eq!(node.json_type(), JsonType::Object);
/// ```
pub fn schema_for<T: Describe + ?Sized>() -> Result<SchemaNode, CyclicTypeError> {
    SchemaGenerator::new().schema_for::<T>()
}

/// Build the schema for `T` with a fresh generator and encode it as
/// indented JSON text.
pub fn to_json_pretty<T: Describe + ?Sized>() -> Result<String, SchemaError> {
    let mut generator = SchemaGenerator::new();
    let node = generator.schema_for::<T>()?;
    generator.to_json_string(&node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDef;

    #[test]
    fn test_struct_and_enum_tables() {
        let mut generator = SchemaGenerator::new();
        generator
            .add_struct(StructDef::new("Point").field(FieldDef::new("x", TypeDef::F64)))
            .add_enum(EnumDef::new("Status", &["Pending"]));

        assert!(generator.is_defined("Point"));
        assert!(generator.is_defined("Status"));
        assert!(!generator.is_defined("Missing"));
        assert_eq!(generator.get_struct("Point").unwrap().fields.len(), 1);
        assert_eq!(
            generator.definitions().collect::<Vec<_>>(),
            vec!["Point", "Status"]
        );
    }

    #[test]
    fn test_redefinition_replaces_kind() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(StructDef::new("Shape"));
        generator.add_enum(EnumDef::new("Shape", &["Circle"]));

        assert!(generator.get_struct("Shape").is_none());
        assert!(generator.get_enum("Shape").is_some());
    }

    #[test]
    fn test_markers() {
        let mut generator = SchemaGenerator::new();
        generator.add_marker("Schema");
        assert_eq!(generator.markers, vec!["JsonSchema", "Schema"]);

        generator.set_markers(&["Only"]);
        assert_eq!(generator.markers, vec!["Only"]);
    }

    #[test]
    fn test_generate_uses_indent() {
        let mut generator = SchemaGenerator::new();
        generator.set_indent("    ");
        let text = generator.generate(&TypeDef::Bool).unwrap();
        assert_eq!(
            text,
            "{\n    \"type\": \"boolean\",\n    \"description\": \"\"\n}"
        );
    }

    #[test]
    fn test_schema_for_registers_dependencies() {
        let mut generator = SchemaGenerator::new();
        let node = generator.schema_for::<Vec<Option<String>>>().unwrap();
        assert!(node.as_object().is_some());
        assert_eq!(generator.definitions().count(), 0);
    }
}
