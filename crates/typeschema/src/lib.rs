//! # typeschema
//!
//! JSON Schema generator for Rust types. Describes a struct's shape (its
//! fields, their types, and attached annotations) as a closed JSON Schema
//! object, e.g. to constrain structured output produced by a remote client.
//!
//! ## Usage
//!
//! ### 1. Annotate your types with `#[derive(JsonSchema)]`
//!
//! ```rust,ignore
//! use typeschema::JsonSchema;
//!
//! #[derive(JsonSchema)]
//! struct Person {
//!     #[schema(description = "Full name")]
//!     name: String,
//!     age: u32,
//!     #[schema(skip)]
//!     cache: Vec<u8>,
//! }
//!
//! let json = typeschema::to_json_pretty::<Person>()?;
//! ```
//!
//! ### 2. Or describe types by hand
//!
//! ```rust
//! use typeschema::{FieldDef, SchemaGenerator, StructDef, TypeDef};
//!
//! let mut generator = SchemaGenerator::new();
//! generator.add_struct(
//!     StructDef::new("Person")
//!         .field(FieldDef::new("name", TypeDef::String).describe("Full name"))
//!         .field(FieldDef::new("age", TypeDef::U32)),
//! );
//!
//! let schema = generator.build(&TypeDef::named("Person")).unwrap();
//! assert_eq!(schema.as_object().unwrap().required, vec!["name", "age"]);
//! ```
//!
//! ### 3. Or extract them from source in build.rs
//!
//! ```rust,ignore
//! // build.rs
//! use typeschema::{SchemaGenerator, TypeDef};
//!
//! fn main() {
//!     let mut generator = SchemaGenerator::new();
//!     generator.add_source_file("src/lib.rs").unwrap();
//!     let json = generator.generate(&TypeDef::named("Person")).unwrap();
//!     std::fs::write("person.schema.json", json).unwrap();
//!
//!     println!("cargo:rerun-if-changed=src/lib.rs");
//! }
//! ```
//!
//! ## Type Mappings
//!
//! | Rust Type | TypeDef | JSON Schema |
//! |-----------|---------|-------------|
//! | `u8`-`u128`, `i8`-`i128`, `usize`, `isize` | `TypeDef::U32`, etc. | `integer` |
//! | `f32`, `f64`, decimals | `TypeDef::F64`, `TypeDef::Decimal` | `number` |
//! | `bool` | `TypeDef::Bool` | `boolean` |
//! | `String`, `&str`, `char` | `TypeDef::String`, `TypeDef::Char` | `string` |
//! | fieldless `enum` | `TypeDef::Named(..)` | `string` + `enum` |
//! | `struct` | `TypeDef::Named(..)` | closed `object` |
//! | `Vec<T>`, `[T; N]`, sets | `TypeDef::vec(T)`, etc. | `array` of `T` |
//! | `HashMap<K, V>` | `TypeDef::map(K, V)` | `array` of `K` |
//! | `Option<T>`, `Box<T>` | `TypeDef::option(T)`, `TypeDef::boxed(T)` | same as `T` |
//! | `serde_json::Value` | `TypeDef::Any` | empty closed `object` |
//! | anything else | `TypeDef::Other(..)` | `string` |
//!
//! A collection at the root is wrapped in an object with a single required
//! `items` property. Every non-skipped field is listed in `required`, even
//! when it is an `Option`.
//!
//! ## Unsupported shapes
//!
//! The derive only accepts non-generic structs with named fields (or no
//! fields) and enums whose variants carry no data. Everything else is a
//! compile error:
//!
//! ```compile_fail
//! #[derive(typeschema::JsonSchema)]
//! struct Meters(f64);
//! ```
//!
//! ```compile_fail
//! #[derive(typeschema::JsonSchema)]
//! enum Message {
//!     Quit,
//!     Write(String),
//! }
//! ```
//!
//! ```compile_fail
//! #[derive(typeschema::JsonSchema)]
//! union Bits {
//!     int: u32,
//!     float: f32,
//! }
//! ```
//!
//! ```compile_fail
//! #[derive(typeschema::JsonSchema)]
//! struct Wrapper<T> {
//!     inner: T,
//! }
//! ```
//!
//! `skip` applies to fields only:
//!
//! ```compile_fail
//! #[derive(typeschema::JsonSchema)]
//! #[schema(skip)]
//! struct Hidden {
//!     value: u8,
//! }
//! ```
//!
//! The source extractor skips the same items with a warning.

// Lets the derive's `::typeschema::` paths resolve inside this crate's tests.
extern crate self as typeschema;

mod builder;
mod describe;
mod error;
mod extractor;
mod generator;
pub mod registry;
mod schema;
mod types;

pub use describe::Describe;
pub use error::{CyclicTypeError, SchemaError};
pub use generator::{schema_for, to_json_pretty, SchemaGenerator};
pub use registry::{TypeMapping, TypeRegistry};
pub use schema::{ArrayNode, EnumNode, JsonType, ObjectNode, ScalarNode, SchemaNode};
pub use types::{Annotations, EnumDef, FieldDef, StructDef, TypeDef};

#[cfg(feature = "derive")]
pub use typeschema_derive::JsonSchema;
