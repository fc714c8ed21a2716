//! Compile-time type descriptors.
//!
//! `Describe` is what `#[derive(JsonSchema)]` implements. Primitive and
//! container impls live here.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::generator::SchemaGenerator;
use crate::types::TypeDef;

/// A Rust type that can describe its own shape.
pub trait Describe {
    /// How a field of this type is referenced.
    fn type_def() -> TypeDef;

    /// Register this type's definition (and those of the types it reaches)
    /// with the generator. Types without a named definition do nothing.
    fn define(_generator: &mut SchemaGenerator) {}
}

macro_rules! describe_primitive {
    ($($ty:ty => $def:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn type_def() -> TypeDef {
                    TypeDef::$def
                }
            }
        )*
    };
}

describe_primitive! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    u128 => U128,
    i128 => I128,
    usize => Usize,
    isize => Isize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    char => Char,
    String => String,
    str => String,
}

impl Describe for () {
    fn type_def() -> TypeDef {
        TypeDef::Other("()".to_string())
    }
}

impl Describe for serde_json::Value {
    fn type_def() -> TypeDef {
        TypeDef::Any
    }
}

macro_rules! describe_sequence {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn type_def() -> TypeDef {
                    TypeDef::vec(T::type_def())
                }

                fn define(generator: &mut SchemaGenerator) {
                    T::define(generator);
                }
            }
        )*
    };
}

describe_sequence!(Vec, VecDeque, LinkedList);

impl<T: Describe> Describe for [T] {
    fn type_def() -> TypeDef {
        TypeDef::vec(T::type_def())
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn type_def() -> TypeDef {
        TypeDef::array(T::type_def(), N)
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn type_def() -> TypeDef {
        TypeDef::set(T::type_def())
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn type_def() -> TypeDef {
        TypeDef::set(T::type_def())
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn type_def() -> TypeDef {
        TypeDef::map(K::type_def(), V::type_def())
    }

    fn define(generator: &mut SchemaGenerator) {
        K::define(generator);
        V::define(generator);
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn type_def() -> TypeDef {
        TypeDef::map(K::type_def(), V::type_def())
    }

    fn define(generator: &mut SchemaGenerator) {
        K::define(generator);
        V::define(generator);
    }
}

impl<T: Describe> Describe for Option<T> {
    fn type_def() -> TypeDef {
        TypeDef::option(T::type_def())
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}

macro_rules! describe_pointer {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty<T> {
                fn type_def() -> TypeDef {
                    TypeDef::boxed(T::type_def())
                }

                fn define(generator: &mut SchemaGenerator) {
                    T::define(generator);
                }
            }
        )*
    };
}

describe_pointer!(Box, Rc, Arc, RefCell);

impl<T: Describe + Copy> Describe for Cell<T> {
    fn type_def() -> TypeDef {
        TypeDef::boxed(T::type_def())
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn type_def() -> TypeDef {
        T::type_def()
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}

impl<T: Describe + ToOwned + ?Sized> Describe for Cow<'_, T> {
    fn type_def() -> TypeDef {
        T::type_def()
    }

    fn define(generator: &mut SchemaGenerator) {
        T::define(generator);
    }
}
