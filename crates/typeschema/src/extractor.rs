//! Source file parser that extracts types annotated with `#[derive(JsonSchema)]`.
//!
//! This module scans Rust source files and registers the annotated structs and
//! enums with a `SchemaGenerator`, honouring the same `#[schema(...)]`
//! attributes as the derive macro.

use crate::error::SchemaError;
use crate::registry::TypeRegistry;
use crate::types::{Annotations, EnumDef, FieldDef, StructDef, TypeDef};
use crate::SchemaGenerator;
use quote::ToTokens;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use syn::{
    Attribute, Fields, GenericArgument, PathArguments, Type, TypeArray, TypePath, TypeSlice,
};
use walkdir::WalkDir;

/// Check if an item has any of the specified marker derives.
///
/// Matches any path whose last segment matches one of the markers, which handles:
/// - `JsonSchema` (direct import)
/// - `typeschema::JsonSchema` (qualified path)
/// - Custom aliases via `add_marker("Schema")`
fn has_marker_derive(attrs: &[Attribute], markers: &[String]) -> bool {
    for attr in attrs {
        if attr.path().is_ident("derive") {
            if let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            ) {
                for path in nested {
                    if let Some(last_segment) = path.segments.last() {
                        let ident = last_segment.ident.to_string();
                        if markers.iter().any(|m| m == &ident) {
                            return true;
                        }
                    }
                }
            }
        }
    }
    false
}

/// Read `#[schema(skip)]` and `#[schema(description = "...")]`.
fn parse_annotations(attrs: &[Attribute]) -> syn::Result<Annotations> {
    let mut annotations = Annotations::default();
    for attr in attrs {
        if !attr.path().is_ident("schema") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                annotations.skip = true;
                Ok(())
            } else if meta.path.is_ident("description") {
                let value: syn::LitStr = meta.value()?.parse()?;
                annotations.description = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `description = \"...\"`"))
            }
        })?;
    }
    Ok(annotations)
}

/// Strips the `r#` prefix from raw identifiers, e.g. `r#type` becomes `type`.
fn field_name(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Resolves type syntax to a `TypeDef`.
struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
    /// User types: declared in the file being parsed or already defined.
    local: &'a HashSet<String>,
}

impl TypeResolver<'_> {
    fn resolve(&self, ty: &Type) -> TypeDef {
        match ty {
            Type::Path(TypePath { qself: None, path }) => self.resolve_path(path),
            Type::Array(TypeArray { elem, len, .. }) => {
                let elem_def = self.resolve(elem);
                match len {
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Int(lit_int),
                        ..
                    }) => match lit_int.base10_parse::<usize>() {
                        Ok(len_val) => TypeDef::array(elem_def, len_val),
                        Err(_) => TypeDef::vec(elem_def),
                    },
                    // length given by a constant expression
                    _ => TypeDef::vec(elem_def),
                }
            }
            Type::Slice(TypeSlice { elem, .. }) => TypeDef::vec(self.resolve(elem)),
            Type::Reference(reference) => {
                // For &str, treat as String
                if let Type::Path(TypePath { path, .. }) = &*reference.elem {
                    if path.is_ident("str") {
                        return TypeDef::String;
                    }
                }
                // Otherwise, follow the reference
                self.resolve(&reference.elem)
            }
            Type::Paren(paren) => self.resolve(&paren.elem),
            Type::Group(group) => self.resolve(&group.elem),
            other => TypeDef::Other(other.to_token_stream().to_string()),
        }
    }

    fn resolve_path(&self, path: &syn::Path) -> TypeDef {
        let Some(segment) = path.segments.last() else {
            return TypeDef::Other(path.to_token_stream().to_string());
        };
        let ident_str = segment.ident.to_string();
        let args = self.generic_args(segment);

        if path.segments.len() == 1 && self.local.contains(&ident_str) {
            return TypeDef::Named(ident_str);
        }

        match ident_str.as_str() {
            // Primitives
            "u8" => return TypeDef::U8,
            "i8" => return TypeDef::I8,
            "u16" => return TypeDef::U16,
            "i16" => return TypeDef::I16,
            "u32" => return TypeDef::U32,
            "i32" => return TypeDef::I32,
            "u64" => return TypeDef::U64,
            "i64" => return TypeDef::I64,
            "u128" => return TypeDef::U128,
            "i128" => return TypeDef::I128,
            "usize" => return TypeDef::Usize,
            "isize" => return TypeDef::Isize,
            "f32" => return TypeDef::F32,
            "f64" => return TypeDef::F64,
            "bool" => return TypeDef::Bool,
            "char" => return TypeDef::Char,
            "String" | "str" => return TypeDef::String,

            // Container types
            "Vec" => {
                return args
                    .into_iter()
                    .next()
                    .map(TypeDef::vec)
                    .unwrap_or(TypeDef::Iterable)
            }
            "Option" => {
                return args
                    .into_iter()
                    .next()
                    .map(TypeDef::option)
                    .unwrap_or(TypeDef::Any)
            }
            _ => {}
        }

        let written = path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::");
        if let Some(mapping) = self.registry.lookup(&written) {
            return mapping.resolve(args);
        }

        // Named type (custom struct/enum)
        TypeDef::Named(ident_str)
    }

    fn generic_args(&self, segment: &syn::PathSegment) -> Vec<TypeDef> {
        match &segment.arguments {
            PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(self.resolve(ty)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Extract a struct definition. Tuple structs have no field names and are
/// not supported.
fn extract_struct(
    resolver: &TypeResolver<'_>,
    item: &syn::ItemStruct,
) -> syn::Result<Option<StructDef>> {
    let annotations = parse_annotations(&item.attrs)?;
    let mut def = StructDef::new(item.ident.to_string());
    def.description = annotations.description;

    match &item.fields {
        Fields::Named(named) => {
            for f in &named.named {
                let Some(ident) = &f.ident else { continue };
                let annotations = parse_annotations(&f.attrs)?;
                let ty = if annotations.skip {
                    TypeDef::Other(f.ty.to_token_stream().to_string())
                } else {
                    resolver.resolve(&f.ty)
                };
                def.fields.push(FieldDef {
                    name: field_name(ident),
                    ty,
                    annotations,
                });
            }
            Ok(Some(def))
        }
        Fields::Unit => Ok(Some(def)),
        Fields::Unnamed(_) => Ok(None),
    }
}

/// Extract an enum definition. Only fieldless variants are supported.
fn extract_enum(item: &syn::ItemEnum) -> syn::Result<Option<EnumDef>> {
    let annotations = parse_annotations(&item.attrs)?;
    if item.variants.iter().any(|v| !matches!(v.fields, Fields::Unit)) {
        return Ok(None);
    }
    let variants: Vec<String> = item.variants.iter().map(|v| v.ident.to_string()).collect();
    let mut def = EnumDef::new(item.ident.to_string(), variants.as_slice());
    def.description = annotations.description;
    Ok(Some(def))
}

/// A struct read from source, kept so its field types can be resolved again
/// when a later file declares a type it refers to. The item is stored as
/// token text so the generator stays `Send`.
#[derive(Debug, Clone)]
pub(crate) struct ExtractedStruct {
    tokens: String,
    def: StructDef,
}

fn item_ident(item: &syn::Item) -> Option<&syn::Ident> {
    match item {
        syn::Item::Struct(s) => Some(&s.ident),
        syn::Item::Enum(e) => Some(&e.ident),
        _ => None,
    }
}

fn is_generic(item: &syn::Item) -> bool {
    match item {
        syn::Item::Struct(s) => !s.generics.params.is_empty(),
        syn::Item::Enum(e) => !e.generics.params.is_empty(),
        _ => false,
    }
}

/// Parse a Rust source file and register marker-annotated types.
///
/// A bare type name resolves to a user type when it is declared in this file
/// or already defined on the generator, before any registry mapping is tried.
fn parse_source_file(codegen: &mut SchemaGenerator, source: &str) -> syn::Result<usize> {
    let file = syn::parse_file(source)?;

    let mut marked = Vec::new();
    for item in &file.items {
        let attrs = match item {
            syn::Item::Struct(s) => &s.attrs,
            syn::Item::Enum(e) => &e.attrs,
            _ => continue,
        };
        if !has_marker_derive(attrs, &codegen.markers) {
            continue;
        }
        if is_generic(item) {
            if let Some(ident) = item_ident(item) {
                tracing::warn!(name = %ident, "generic types are not supported, skipping");
            }
            continue;
        }
        marked.push(item);
    }

    let introduced: Vec<String> = marked
        .iter()
        .copied()
        .filter_map(item_ident)
        .map(|ident| ident.to_string())
        .filter(|name| !codegen.is_defined(name))
        .collect();

    let mut known: HashSet<String> = codegen.definitions().map(str::to_string).collect();
    known.extend(marked.iter().copied().filter_map(item_ident).map(|i| i.to_string()));

    let mut structs = Vec::new();
    let mut enums = Vec::new();
    let mut refreshed = Vec::new();
    {
        let resolver = TypeResolver {
            registry: &codegen.registry,
            local: &known,
        };
        for item in marked {
            match item {
                syn::Item::Struct(s) => match extract_struct(&resolver, s)? {
                    Some(def) => structs.push(ExtractedStruct {
                        tokens: s.to_token_stream().to_string(),
                        def,
                    }),
                    None => tracing::warn!(name = %s.ident, "tuple structs are not supported, skipping"),
                },
                syn::Item::Enum(e) => match extract_enum(e)? {
                    Some(def) => enums.push(def),
                    None => {
                        tracing::warn!(name = %e.ident, "enums with data are not supported, skipping")
                    }
                },
                _ => {}
            }
        }

        // Structs from earlier files may have resolved a newly declared name
        // through the registry. Re-resolve the ones nobody has replaced since.
        if !introduced.is_empty() {
            for (index, prior) in codegen.extracted.iter().enumerate() {
                if codegen.get_struct(&prior.def.name) != Some(&prior.def) {
                    continue;
                }
                let Ok(item) = syn::parse_str::<syn::ItemStruct>(&prior.tokens) else {
                    continue;
                };
                if let Ok(Some(def)) = extract_struct(&resolver, &item) {
                    if def != prior.def {
                        refreshed.push((index, def));
                    }
                }
            }
        }
    }

    for (index, def) in refreshed {
        tracing::debug!(name = %def.name, "re-resolved fields after new declarations");
        codegen.extracted[index].def = def.clone();
        codegen.add_struct(def);
    }

    let count = structs.len() + enums.len();
    for extracted in structs {
        codegen.add_struct(extracted.def.clone());
        codegen
            .extracted
            .retain(|prior| prior.def.name != extracted.def.name);
        codegen.extracted.push(extracted);
    }
    for def in enums {
        codegen.add_enum(def);
    }
    Ok(count)
}

impl SchemaGenerator {
    /// Parse a single Rust source file and register types with marker derives.
    ///
    /// By default, looks for `#[derive(JsonSchema)]` or any path ending with `JsonSchema`.
    /// Use `add_marker()` to recognize additional marker names.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut generator = SchemaGenerator::new();
    /// generator.add_source_file("src/lib.rs")?;
    /// let json = generator.generate(&TypeDef::named("Person"))?;
    /// ```
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, SchemaError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = parse_source_file(self, &source).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), count, "extracted types from source file");
        Ok(self)
    }

    /// Parse Rust source from a string and register types with marker derives.
    pub fn add_source_str(&mut self, source: &str) -> Result<&mut Self, SchemaError> {
        parse_source_file(self, source).map_err(|source| SchemaError::Parse {
            path: PathBuf::from("<string>"),
            source,
        })?;
        Ok(self)
    }

    /// Recursively scan a directory for `.rs` files and register annotated types.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut generator = SchemaGenerator::new();
    /// generator.add_source_dir("src/")?;
    /// ```
    pub fn add_source_dir(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, SchemaError> {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().map(|e| e == "rs").unwrap_or(false) {
                self.add_source_file(path)?;
            }
        }
        Ok(self)
    }
}
