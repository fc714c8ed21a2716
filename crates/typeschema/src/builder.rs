//! Recursive type -> schema mapping.
//!
//! Classification order for every type, at the root and for each member:
//!
//! 1. `Option`/`Box` wrappers are peeled.
//! 2. Collections come first. A collection member becomes an array whose
//!    `items` is the schema of the element type. A collection at the root
//!    becomes a closed object with a single `items` array property.
//! 3. Registered structs, unregistered names and `Any` become closed objects.
//!    Every non-skipped field is inlined and listed in `required`.
//! 4. Everything else is a scalar (with an `enum` list for registered enums).

use crate::error::CyclicTypeError;
use crate::generator::SchemaGenerator;
use crate::schema::{ArrayNode, EnumNode, JsonType, ObjectNode, ScalarNode, SchemaNode};
use crate::types::{EnumDef, StructDef, TypeDef};

/// What the definition tables say about a (peeled) type.
enum Shape<'a> {
    Collection(&'a TypeDef),
    Struct(&'a StructDef),
    /// A complex type without fields to enumerate.
    OpaqueObject,
    Enum(&'a EnumDef),
    Scalar(JsonType),
}

impl SchemaGenerator {
    /// Build the schema for `ty`.
    ///
    /// Never fails for an acyclic type graph; unknown types degrade to
    /// `string` or an empty object instead of erroring.
    pub fn build(&self, ty: &TypeDef) -> Result<SchemaNode, CyclicTypeError> {
        let mut path = Vec::new();
        self.build_root(ty, &mut path)
    }

    fn build_root(
        &self,
        ty: &TypeDef,
        path: &mut Vec<String>,
    ) -> Result<SchemaNode, CyclicTypeError> {
        match self.shape(ty) {
            Shape::Collection(element) => {
                let array = ArrayNode::new(self.build_root(element, path)?);
                Ok(SchemaNode::WrappedArray(ObjectNode::wrapping(array)))
            }
            shape => self.build_shape(shape, None, path),
        }
    }

    /// Schema for a struct member. The member's own description wins over
    /// any description attached to its type.
    fn build_member(
        &self,
        ty: &TypeDef,
        description: &str,
        path: &mut Vec<String>,
    ) -> Result<SchemaNode, CyclicTypeError> {
        match self.shape(ty) {
            Shape::Collection(element) => Ok(SchemaNode::Array(ArrayNode::new(
                self.build_root(element, path)?,
            ))),
            shape => self.build_shape(shape, Some(description), path),
        }
    }

    fn build_shape(
        &self,
        shape: Shape<'_>,
        member_description: Option<&str>,
        path: &mut Vec<String>,
    ) -> Result<SchemaNode, CyclicTypeError> {
        match shape {
            Shape::Struct(def) => self.build_struct(def, path),
            Shape::OpaqueObject => Ok(SchemaNode::Object(ObjectNode::new())),
            Shape::Enum(def) => {
                let description = member_description
                    .or(def.description.as_deref())
                    .unwrap_or_default();
                Ok(SchemaNode::Enum(EnumNode {
                    ty: JsonType::String,
                    description: description.to_string(),
                    variants: def.variants.clone(),
                }))
            }
            Shape::Scalar(ty) => Ok(SchemaNode::Scalar(ScalarNode {
                ty,
                description: member_description.unwrap_or_default().to_string(),
            })),
            // callers match collections first; they decide whether to wrap
            Shape::Collection(element) => Ok(SchemaNode::Array(ArrayNode::new(
                self.build_root(element, path)?,
            ))),
        }
    }

    fn build_struct(
        &self,
        def: &StructDef,
        path: &mut Vec<String>,
    ) -> Result<SchemaNode, CyclicTypeError> {
        if let Some(start) = path.iter().position(|name| name == &def.name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(def.name.clone());
            return Err(CyclicTypeError { cycle });
        }

        tracing::debug!(name = %def.name, fields = def.fields.len(), "building object schema");
        path.push(def.name.clone());

        let mut object = ObjectNode::new();
        for field in &def.fields {
            if field.is_skipped() {
                tracing::trace!(owner = %def.name, field = %field.name, "skipping field");
                continue;
            }
            let description = field.description().unwrap_or_default();
            let node = self.build_member(&field.ty, description, path)?;
            object.insert_required(field.name.clone(), node);
        }

        path.pop();
        Ok(SchemaNode::Object(object))
    }

    fn shape<'a>(&'a self, ty: &'a TypeDef) -> Shape<'a> {
        let ty = ty.peel();
        if let Some(element) = ty.element_type() {
            if matches!(ty, TypeDef::Iterable) {
                tracing::warn!("collection element type unknown, falling back to an open object");
            }
            return Shape::Collection(element);
        }

        match ty {
            TypeDef::Named(name) => {
                if let Some(def) = self.get_struct(name) {
                    Shape::Struct(def)
                } else if let Some(def) = self.get_enum(name) {
                    Shape::Enum(def)
                } else {
                    tracing::warn!(%name, "type is not registered, emitting an empty object");
                    Shape::OpaqueObject
                }
            }
            TypeDef::Any => Shape::OpaqueObject,
            other => Shape::Scalar(other.json_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDef;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn widget_generator() -> SchemaGenerator {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Widget")
                .field(FieldDef::new("x", TypeDef::I32).describe("foo"))
                .field(FieldDef::new("y", TypeDef::String).skip()),
        );
        generator
    }

    fn value(node: &SchemaNode) -> serde_json::Value {
        node.to_value().unwrap()
    }

    #[test]
    fn test_primitive_mapping() {
        let generator = SchemaGenerator::new();
        let cases = [
            (TypeDef::String, "string"),
            (TypeDef::Char, "string"),
            (TypeDef::U8, "integer"),
            (TypeDef::I64, "integer"),
            (TypeDef::Usize, "integer"),
            (TypeDef::F32, "number"),
            (TypeDef::F64, "number"),
            (TypeDef::Decimal, "number"),
            (TypeDef::Bool, "boolean"),
            (TypeDef::Other("fn(u8)".into()), "string"),
        ];
        for (ty, expected) in cases {
            let node = generator.build(&ty).unwrap();
            assert_eq!(value(&node), json!({ "type": expected, "description": "" }), "{ty:?}");
        }
    }

    #[test]
    fn test_enum_lists_variants_in_order() {
        let mut generator = SchemaGenerator::new();
        generator.add_enum(EnumDef::new("Letter", &["C", "A", "B"]).describe("a letter"));

        let node = generator.build(&TypeDef::named("Letter")).unwrap();
        assert_eq!(
            value(&node),
            json!({ "type": "string", "description": "a letter", "enum": ["C", "A", "B"] })
        );
    }

    #[test]
    fn test_skip_and_required() {
        let node = widget_generator().build(&TypeDef::named("Widget")).unwrap();
        assert_eq!(
            value(&node),
            json!({
                "type": "object",
                "properties": { "x": { "type": "integer", "description": "foo" } },
                "required": ["x"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_collection_member_is_plain_array() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Scores").field(FieldDef::new("values", TypeDef::vec(TypeDef::I32))),
        );

        let node = generator.build(&TypeDef::named("Scores")).unwrap();
        let object = node.as_object().unwrap();
        assert_eq!(
            value(object.property("values").unwrap()),
            json!({ "type": "array", "items": { "type": "integer", "description": "" } })
        );
    }

    #[test]
    fn test_root_collection_is_wrapped() {
        let generator = widget_generator();
        let node = generator.build(&TypeDef::vec(TypeDef::named("Widget"))).unwrap();
        let widget = generator.build(&TypeDef::named("Widget")).unwrap();

        assert!(matches!(node, SchemaNode::WrappedArray(_)));
        assert_eq!(
            value(&node),
            json!({
                "type": "object",
                "properties": { "items": { "type": "array", "items": value(&widget) } },
                "required": ["items"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_nested_collection_items_use_root_rules() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Grid")
                .field(FieldDef::new("rows", TypeDef::vec(TypeDef::vec(TypeDef::U8)))),
        );

        let node = generator.build(&TypeDef::named("Grid")).unwrap();
        let rows = node.as_object().unwrap().property("rows").unwrap();
        let items = &rows.as_array().unwrap().items;
        assert!(matches!(**items, SchemaNode::WrappedArray(_)));
    }

    #[test]
    fn test_nested_struct_is_inlined() {
        let mut generator = widget_generator();
        generator.add_struct(
            StructDef::new("Panel")
                .field(FieldDef::new("main", TypeDef::named("Widget")).describe("ignored"))
                .field(FieldDef::new("extra", TypeDef::option(TypeDef::named("Widget")))),
        );

        let widget = value(&generator.build(&TypeDef::named("Widget")).unwrap());
        let panel = value(&generator.build(&TypeDef::named("Panel")).unwrap());
        assert_eq!(panel["properties"]["main"], widget);
        assert_eq!(panel["properties"]["extra"], widget);
        assert_eq!(panel["required"], json!(["main", "extra"]));
    }

    #[test]
    fn test_member_description_overrides_enum_description() {
        let mut generator = SchemaGenerator::new();
        generator
            .add_enum(EnumDef::new("Color", &["Red", "Green"]).describe("type level"))
            .add_struct(
                StructDef::new("Paint")
                    .field(FieldDef::new("primary", TypeDef::named("Color")).describe("member level"))
                    .field(FieldDef::new("secondary", TypeDef::named("Color"))),
            );

        let node = value(&generator.build(&TypeDef::named("Paint")).unwrap());
        assert_eq!(node["properties"]["primary"]["description"], "member level");
        assert_eq!(node["properties"]["secondary"]["description"], "");
        assert_eq!(node["properties"]["secondary"]["enum"], json!(["Red", "Green"]));
    }

    #[test]
    fn test_optional_members_stay_required() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Contact")
                .field(FieldDef::new("email", TypeDef::option(TypeDef::String)))
                .field(FieldDef::new("phone", TypeDef::option(TypeDef::U64))),
        );

        let node = value(&generator.build(&TypeDef::named("Contact")).unwrap());
        assert_eq!(node["required"], json!(["email", "phone"]));
        assert_eq!(node["properties"]["phone"]["type"], "integer");
    }

    #[test]
    fn test_required_follows_declaration_order() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Ordered")
                .field(FieldDef::new("zulu", TypeDef::Bool))
                .field(FieldDef::new("alpha", TypeDef::Bool).skip())
                .field(FieldDef::new("mike", TypeDef::Bool))
                .field(FieldDef::new("bravo", TypeDef::Bool)),
        );

        let node = generator.build(&TypeDef::named("Ordered")).unwrap();
        let object = node.as_object().unwrap();
        assert_eq!(object.required, vec!["zulu", "mike", "bravo"]);
        assert_eq!(
            object.properties.keys().collect::<Vec<_>>(),
            vec!["zulu", "mike", "bravo"]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let generator = widget_generator();
        let ty = TypeDef::vec(TypeDef::named("Widget"));
        assert_eq!(generator.build(&ty).unwrap(), generator.build(&ty).unwrap());
    }

    #[test]
    fn test_map_uses_first_type_parameter() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Inventory")
                .field(FieldDef::new("stock", TypeDef::map(TypeDef::String, TypeDef::U32))),
        );

        let node = value(&generator.build(&TypeDef::named("Inventory")).unwrap());
        assert_eq!(
            node["properties"]["stock"],
            json!({ "type": "array", "items": { "type": "string", "description": "" } })
        );
    }

    #[test]
    fn test_untyped_fallbacks() {
        let generator = SchemaGenerator::new();
        let empty_object = json!({
            "type": "object",
            "properties": {},
            "required": [],
            "additionalProperties": false
        });

        assert_eq!(value(&generator.build(&TypeDef::Any).unwrap()), empty_object);
        assert_eq!(
            value(&generator.build(&TypeDef::named("Unregistered")).unwrap()),
            empty_object
        );

        let node = value(&generator.build(&TypeDef::Iterable).unwrap());
        assert_eq!(node["properties"]["items"]["items"], empty_object);
    }

    #[test]
    fn test_direct_cycle() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Node").field(FieldDef::new("next", TypeDef::option(TypeDef::named("Node")))),
        );

        let err = generator.build(&TypeDef::named("Node")).unwrap_err();
        assert_eq!(err.cycle, vec!["Node", "Node"]);
    }

    #[test]
    fn test_mutual_cycle() {
        let mut generator = SchemaGenerator::new();
        generator
            .add_struct(StructDef::new("A").field(FieldDef::new("b", TypeDef::named("B"))))
            .add_struct(StructDef::new("B").field(FieldDef::new("a", TypeDef::vec(TypeDef::named("A")))));

        let err = generator.build(&TypeDef::named("A")).unwrap_err();
        assert_eq!(err.cycle, vec!["A", "B", "A"]);

        let err = generator.build(&TypeDef::vec(TypeDef::named("B"))).unwrap_err();
        assert_eq!(err.cycle, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_skipped_cycle_is_not_followed() {
        let mut generator = SchemaGenerator::new();
        generator.add_struct(
            StructDef::new("Tree")
                .field(FieldDef::new("label", TypeDef::String))
                .field(FieldDef::new("parent", TypeDef::boxed(TypeDef::named("Tree"))).skip()),
        );

        let node = generator.build(&TypeDef::named("Tree")).unwrap();
        assert_eq!(node.as_object().unwrap().required, vec!["label"]);
    }

    #[test]
    fn test_repeated_type_is_not_a_cycle() {
        let mut generator = widget_generator();
        generator.add_struct(
            StructDef::new("Pair")
                .field(FieldDef::new("left", TypeDef::named("Widget")))
                .field(FieldDef::new("right", TypeDef::named("Widget"))),
        );

        assert!(generator.build(&TypeDef::named("Pair")).is_ok());
    }
}
