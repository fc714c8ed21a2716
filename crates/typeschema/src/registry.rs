//! Type registry for classifying external Rust type paths.
//!
//! The source extractor only sees type syntax, so it cannot tell that
//! `uuid::Uuid` serializes as a string or that `IndexMap<K, V>` is a map. The
//! registry answers that in a data-driven way: built-in mappings cover std
//! and common ecosystem types, and users can add their own.

use std::collections::BTreeMap;

use crate::types::TypeDef;

/// How a registered type path maps onto a `TypeDef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMapping {
    /// Always the given type, whatever the generic arguments are.
    Fixed(TypeDef),
    /// A sequence over the first generic argument.
    Sequence,
    /// A set over the first generic argument.
    Set,
    /// A map from the first generic argument to the second.
    Map,
    /// A wrapper that serializes as its first generic argument.
    Transparent,
}

impl TypeMapping {
    /// Produce a concrete `TypeDef` from the generic arguments written at the
    /// use site. Missing arguments degrade to the untyped forms.
    pub fn resolve(&self, mut args: Vec<TypeDef>) -> TypeDef {
        let mut next = || {
            if args.is_empty() {
                None
            } else {
                Some(args.remove(0))
            }
        };
        match self {
            TypeMapping::Fixed(ty) => ty.clone(),
            TypeMapping::Sequence => next().map(TypeDef::vec).unwrap_or(TypeDef::Iterable),
            TypeMapping::Set => next().map(TypeDef::set).unwrap_or(TypeDef::Iterable),
            TypeMapping::Map => match (next(), next()) {
                (Some(key), Some(value)) => TypeDef::map(key, value),
                _ => TypeDef::Iterable,
            },
            TypeMapping::Transparent => next().map(TypeDef::boxed).unwrap_or(TypeDef::Any),
        }
    }
}

/// A registry of fully-qualified Rust type path -> `TypeMapping` associations.
///
/// # Built-in mappings
///
/// | Rust type | Mapping |
/// |-----------|---------|
/// | `std::collections::VecDeque<T>`, `LinkedList<T>` | sequence of `T` |
/// | `std::collections::HashSet<T>`, `BTreeSet<T>`, `indexmap::IndexSet<T>` | set of `T` |
/// | `std::collections::HashMap<K, V>`, `BTreeMap<K, V>`, `indexmap::IndexMap<K, V>` | map |
/// | `Box<T>`, `Rc<T>`, `Arc<T>`, `Cow<T>`, `RefCell<T>`, `Cell<T>` | `T` |
/// | `uuid::Uuid`, `chrono::DateTime`, `chrono::NaiveDate`, `chrono::NaiveDateTime`, `std::path::PathBuf`, `url::Url` | string |
/// | `rust_decimal::Decimal` | number |
/// | `serde_json::Value` | open object |
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    mappings: BTreeMap<String, TypeMapping>,
}

impl TypeRegistry {
    /// Create an empty registry with no mappings.
    pub fn new() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in mappings.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register all built-in mappings.
    pub fn register_builtins(&mut self) {
        for path in [
            "std::collections::VecDeque",
            "std::collections::LinkedList",
        ] {
            self.register(path, TypeMapping::Sequence);
        }

        for path in [
            "std::collections::HashSet",
            "std::collections::BTreeSet",
            "hashbrown::HashSet",
            "indexmap::IndexSet",
        ] {
            self.register(path, TypeMapping::Set);
        }

        for path in [
            "std::collections::HashMap",
            "std::collections::BTreeMap",
            "hashbrown::HashMap",
            "indexmap::IndexMap",
        ] {
            self.register(path, TypeMapping::Map);
        }

        for path in [
            "std::boxed::Box",
            "std::rc::Rc",
            "std::sync::Arc",
            "std::borrow::Cow",
            "std::cell::RefCell",
            "std::cell::Cell",
        ] {
            self.register(path, TypeMapping::Transparent);
        }

        for path in [
            "uuid::Uuid",
            "chrono::DateTime",
            "chrono::NaiveDate",
            "chrono::NaiveDateTime",
            "std::path::PathBuf",
            "url::Url",
        ] {
            self.register(path, TypeMapping::Fixed(TypeDef::String));
        }

        self.register("rust_decimal::Decimal", TypeMapping::Fixed(TypeDef::Decimal));
        self.register("serde_json::Value", TypeMapping::Fixed(TypeDef::Any));
    }

    /// Register a mapping for a fully-qualified Rust type path.
    ///
    /// If a mapping already exists for this path, it is replaced.
    pub fn register(&mut self, path: impl Into<String>, mapping: TypeMapping) {
        self.mappings.insert(path.into(), mapping);
    }

    /// Look up the mapping for a path exactly as registered.
    pub fn get(&self, path: &str) -> Option<&TypeMapping> {
        self.mappings.get(path)
    }

    /// Look up a path as written in source.
    ///
    /// Tries the exact path first, then any registered path ending in the
    /// same segment(s), so `HashMap` and `collections::HashMap` both find
    /// `std::collections::HashMap`.
    pub fn lookup(&self, written: &str) -> Option<&TypeMapping> {
        if let Some(mapping) = self.mappings.get(written) {
            return Some(mapping);
        }
        let suffix = format!("::{written}");
        self.mappings
            .iter()
            .find(|(path, _)| path.ends_with(&suffix))
            .map(|(_, mapping)| mapping)
    }

    /// Check if a type path is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.mappings.contains_key(path)
    }

    /// Remove a type mapping.
    pub fn unregister(&mut self, path: &str) -> Option<TypeMapping> {
        self.mappings.remove(path)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
