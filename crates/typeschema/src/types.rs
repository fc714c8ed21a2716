//! Type definitions for the schema generator.

use crate::schema::JsonType;

static ANY: TypeDef = TypeDef::Any;

/// Describes a Rust type well enough to derive a JSON Schema for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDef {
    // Integer primitives
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    Usize,
    Isize,

    // Floating point and decimal
    F32,
    F64,
    Decimal,

    Bool,
    Char,
    String,

    // Collection types
    Vec(Box<TypeDef>),
    Array(Box<TypeDef>, usize),
    Set(Box<TypeDef>),
    Map(Box<TypeDef>, Box<TypeDef>),
    /// A collection whose element type is unknown.
    Iterable,

    // Transparent wrappers
    Option(Box<TypeDef>),
    Box(Box<TypeDef>),

    /// Reference to a struct or enum registered with the generator.
    Named(String),

    /// Untyped placeholder, rendered as an open object.
    Any,

    /// A type the generator has no classification for.
    Other(String),
}

impl TypeDef {
    pub fn vec(inner: TypeDef) -> Self {
        TypeDef::Vec(Box::new(inner))
    }

    pub fn array(inner: TypeDef, len: usize) -> Self {
        TypeDef::Array(Box::new(inner), len)
    }

    pub fn set(inner: TypeDef) -> Self {
        TypeDef::Set(Box::new(inner))
    }

    pub fn map(key: TypeDef, value: TypeDef) -> Self {
        TypeDef::Map(Box::new(key), Box::new(value))
    }

    pub fn option(inner: TypeDef) -> Self {
        TypeDef::Option(Box::new(inner))
    }

    pub fn boxed(inner: TypeDef) -> Self {
        TypeDef::Box(Box::new(inner))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeDef::Named(name.into())
    }

    /// Strip `Option` and `Box` layers, which never show up in the schema.
    pub fn peel(&self) -> &TypeDef {
        match self {
            TypeDef::Option(inner) | TypeDef::Box(inner) => inner.peel(),
            other => other,
        }
    }

    /// Whether this type is rendered as a JSON array.
    ///
    /// `String` is never a collection even though it is a sequence of chars.
    pub fn is_collection(&self) -> bool {
        matches!(
            self.peel(),
            TypeDef::Vec(_)
                | TypeDef::Array(_, _)
                | TypeDef::Set(_)
                | TypeDef::Map(_, _)
                | TypeDef::Iterable
        )
    }

    /// Element type of a collection.
    ///
    /// Maps yield their first type parameter (the key). An `Iterable` has no
    /// known element and yields the `Any` placeholder. Non-collections yield
    /// `None`.
    pub fn element_type(&self) -> Option<&TypeDef> {
        match self.peel() {
            TypeDef::Vec(inner) | TypeDef::Array(inner, _) | TypeDef::Set(inner) => Some(inner),
            TypeDef::Map(key, _) => Some(key),
            TypeDef::Iterable => Some(&ANY),
            _ => None,
        }
    }

    /// The JSON `type` keyword for this type, as far as it can be told
    /// without the definition tables.
    ///
    /// `Named` types map to `object` here; the builder refines registered
    /// enums to `string`.
    pub fn json_type(&self) -> JsonType {
        match self.peel() {
            TypeDef::U8
            | TypeDef::I8
            | TypeDef::U16
            | TypeDef::I16
            | TypeDef::U32
            | TypeDef::I32
            | TypeDef::U64
            | TypeDef::I64
            | TypeDef::U128
            | TypeDef::I128
            | TypeDef::Usize
            | TypeDef::Isize => JsonType::Integer,

            TypeDef::F32 | TypeDef::F64 | TypeDef::Decimal => JsonType::Number,

            TypeDef::Bool => JsonType::Boolean,
            TypeDef::Char | TypeDef::String => JsonType::String,

            TypeDef::Vec(_)
            | TypeDef::Array(_, _)
            | TypeDef::Set(_)
            | TypeDef::Map(_, _)
            | TypeDef::Iterable => JsonType::Array,

            TypeDef::Named(_) | TypeDef::Any => JsonType::Object,

            TypeDef::Other(_) => JsonType::String,

            // peel() never returns a wrapper
            TypeDef::Option(inner) | TypeDef::Box(inner) => inner.json_type(),
        }
    }
}

/// Per-member (or per-type) metadata that shapes the generated schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Text surfaced in the `description` keyword.
    pub description: Option<String>,
    /// Drop the member from `properties` and `required`.
    pub skip: bool,
}

/// One field of a struct definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeDef,
    pub annotations: Annotations,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeDef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Annotations::default(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.annotations.description = Some(description.into());
        self
    }

    pub fn skip(mut self) -> Self {
        self.annotations.skip = true;
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.annotations.description.as_deref()
    }

    pub fn is_skipped(&self) -> bool {
        self.annotations.skip
    }
}

/// A struct with named fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// A fieldless enum. Values are serialized by variant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, variants: &[impl AsRef<str>]) -> Self {
        Self {
            name: name.into(),
            description: None,
            variants: variants.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_json_types() {
        assert_eq!(TypeDef::U32.json_type(), JsonType::Integer);
        assert_eq!(TypeDef::I128.json_type(), JsonType::Integer);
        assert_eq!(TypeDef::F32.json_type(), JsonType::Number);
        assert_eq!(TypeDef::Decimal.json_type(), JsonType::Number);
        assert_eq!(TypeDef::Bool.json_type(), JsonType::Boolean);
        assert_eq!(TypeDef::Char.json_type(), JsonType::String);
        assert_eq!(TypeDef::String.json_type(), JsonType::String);
    }

    #[test]
    fn test_fallback_json_types() {
        assert_eq!(TypeDef::Any.json_type(), JsonType::Object);
        assert_eq!(TypeDef::named("Widget").json_type(), JsonType::Object);
        assert_eq!(TypeDef::Other("fn()".into()).json_type(), JsonType::String);
    }

    #[test]
    fn test_wrappers_are_transparent() {
        let nested = TypeDef::option(TypeDef::boxed(TypeDef::U8));
        assert_eq!(nested.peel(), &TypeDef::U8);
        assert_eq!(nested.json_type(), JsonType::Integer);

        let optional_list = TypeDef::option(TypeDef::vec(TypeDef::String));
        assert!(optional_list.is_collection());
    }

    #[test]
    fn test_string_is_not_a_collection() {
        assert!(!TypeDef::String.is_collection());
        assert!(TypeDef::String.element_type().is_none());
    }

    #[test]
    fn test_element_types() {
        assert_eq!(TypeDef::vec(TypeDef::U32).element_type(), Some(&TypeDef::U32));
        assert_eq!(
            TypeDef::array(TypeDef::Bool, 4).element_type(),
            Some(&TypeDef::Bool)
        );
        assert_eq!(
            TypeDef::map(TypeDef::String, TypeDef::U64).element_type(),
            Some(&TypeDef::String)
        );
        assert_eq!(TypeDef::Iterable.element_type(), Some(&TypeDef::Any));
    }

    #[test]
    fn test_field_builder() {
        let field = FieldDef::new("x", TypeDef::I32).describe("foo");
        assert_eq!(field.description(), Some("foo"));
        assert!(!field.is_skipped());
        assert!(FieldDef::new("y", TypeDef::String).skip().is_skipped());
    }
}
