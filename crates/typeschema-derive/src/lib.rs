//! Proc-macro providing the `#[derive(JsonSchema)]` attribute.
//!
//! The derive implements `typeschema::Describe`, emitting the type's
//! definition table at compile time so no reflection is needed at runtime.
//!
//! # Usage
//!
//! ```rust,ignore
//! use typeschema::JsonSchema;
//!
//! #[derive(JsonSchema)]
//! #[schema(description = "A drawable widget")]
//! struct Widget {
//!     #[schema(description = "Horizontal offset")]
//!     x: i32,
//!     #[schema(skip)]
//!     cache: Vec<u8>,
//!     parts: Vec<Part>,
//! }
//!
//! #[derive(JsonSchema)]
//! enum Part {
//!     Knob,
//!     Lever,
//! }
//! ```
//!
//! Supported: structs with named fields, unit structs, and enums whose
//! variants are all fieldless. Generic types, tuple structs, enums with data
//! and unions are rejected at compile time.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive `typeschema::Describe` for a struct or fieldless enum.
///
/// Field attributes:
/// - `#[schema(description = "...")]` sets the property's `description`.
/// - `#[schema(skip)]` leaves the field out of the schema entirely. A skipped
///   field's type does not need to implement `Describe`.
///
/// The type itself accepts `#[schema(description = "...")]`.
#[proc_macro_derive(JsonSchema, attributes(schema))]
pub fn derive_json_schema(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct SchemaAttrs {
    description: Option<LitStr>,
    skip: bool,
}

fn parse_schema_attrs(attrs: &[Attribute]) -> syn::Result<SchemaAttrs> {
    let mut parsed = SchemaAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("schema") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                parsed.skip = true;
                Ok(())
            } else if meta.path.is_ident("description") {
                parsed.description = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `description = \"...\"`"))
            }
        })?;
    }
    Ok(parsed)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "JsonSchema cannot be derived for generic types",
        ));
    }

    let attrs = parse_schema_attrs(&input.attrs)?;
    if attrs.skip {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`skip` is only allowed on fields",
        ));
    }

    let ident = &input.ident;
    let name = ident.to_string();
    let type_description = attrs
        .description
        .map(|desc| quote!(.describe(#desc)));

    let register = match &input.data {
        Data::Struct(data) => {
            let fields = match &data.fields {
                Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
                Fields::Unit => Vec::new(),
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "JsonSchema cannot be derived for tuple structs",
                    ))
                }
            };

            let mut field_defs = Vec::new();
            let mut dependencies = Vec::new();
            for field in fields {
                let field_attrs = parse_schema_attrs(&field.attrs)?;
                let Some(field_ident) = &field.ident else {
                    continue;
                };
                let field_name = field_ident.to_string();
                let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
                let ty = &field.ty;
                let description = field_attrs
                    .description
                    .map(|desc| quote!(.describe(#desc)));

                if field_attrs.skip {
                    let written = ty.to_token_stream().to_string();
                    field_defs.push(quote! {
                        ::typeschema::FieldDef::new(
                            #field_name,
                            ::typeschema::TypeDef::Other(::std::string::String::from(#written)),
                        )
                        #description
                        .skip()
                    });
                } else {
                    field_defs.push(quote! {
                        ::typeschema::FieldDef::new(
                            #field_name,
                            <#ty as ::typeschema::Describe>::type_def(),
                        )
                        #description
                    });
                    dependencies.push(quote! {
                        <#ty as ::typeschema::Describe>::define(generator);
                    });
                }
            }

            quote! {
                generator.add_struct(
                    ::typeschema::StructDef::new(#name)
                        #type_description
                        #(.field(#field_defs))*
                );
                #(#dependencies)*
            }
        }
        Data::Enum(data) => {
            let mut variants = Vec::new();
            for variant in &data.variants {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "JsonSchema can only be derived for enums with fieldless variants",
                    ));
                }
                if let Some(attr) = variant.attrs.iter().find(|a| a.path().is_ident("schema")) {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "`schema` attributes are not supported on enum variants",
                    ));
                }
                variants.push(variant.ident.to_string());
            }

            quote! {
                generator.add_enum(
                    ::typeschema::EnumDef::new(#name, &[#(#variants),*] as &[&str])
                        #type_description
                );
            }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "JsonSchema cannot be derived for unions",
            ))
        }
    };

    Ok(quote! {
        impl ::typeschema::Describe for #ident {
            fn type_def() -> ::typeschema::TypeDef {
                ::typeschema::TypeDef::Named(::std::string::String::from(#name))
            }

            fn define(generator: &mut ::typeschema::SchemaGenerator) {
                // registered before its fields so self-references terminate here
                if generator.is_defined(#name) {
                    return;
                }
                #register
            }
        }
    })
}
