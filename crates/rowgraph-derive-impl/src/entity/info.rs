// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Entity` generation.
//!
//! Emits a function-local `static EntityInfo` so the metadata lives in
//! read-only memory and needs no lazy initialization:
//!
//! ```rust,ignore
//! impl ::rowgraph_core::info::Entity for Workflow {
//!     fn entity_info() -> &'static ::rowgraph_core::info::EntityInfo {
//!         static INFO: ::rowgraph_core::info::EntityInfo = EntityInfo {
//!             type_name:  "Workflow",
//!             type_id:    TypeId::of::<Workflow>,
//!             container:  None,
//!             name:       Some("workflows"),
//!             properties: &[ /* one PropertyInfo per mapped field */ ],
//!             construct:  || Box::new(<Workflow as Default>::default())
//!         };
//!         &INFO
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::{
    accessors,
    parse::{EntityDef, FieldDef, FieldKind}
};

/// Generate the `Entity` implementation.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let type_name = entity.name_str();
    let container = optional_str(entity.schema.as_deref());
    let name = optional_str(entity.table.as_deref());
    let properties: Vec<TokenStream> = entity
        .mapped_fields()
        .map(|field| property_info(entity, field))
        .collect();

    quote! {
        impl ::rowgraph_core::info::Entity for #ident {
            fn entity_info() -> &'static ::rowgraph_core::info::EntityInfo {
                static INFO: ::rowgraph_core::info::EntityInfo = ::rowgraph_core::info::EntityInfo {
                    type_name: #type_name,
                    type_id: ::core::any::TypeId::of::<#ident>,
                    container: #container,
                    name: #name,
                    properties: &[#(#properties),*],
                    construct: || {
                        ::std::boxed::Box::new(<#ident as ::core::default::Default>::default())
                            as ::std::boxed::Box<dyn ::core::any::Any + ::core::marker::Send + ::core::marker::Sync>
                    }
                };
                &INFO
            }
        }
    }
}

fn property_info(entity: &EntityDef, field: &FieldDef) -> TokenStream {
    let name = field.name_str();
    let column = optional_str(field.column_name());
    let alias = optional_str(field.column.alias.as_deref());
    let flags = flags(field);
    let accessor = accessors::generate(entity, field);

    let (kind, value_kind) = match &field.kind {
        FieldKind::Scalar => (
            quote! { ::rowgraph_core::info::PropertyKind::Scalar },
            scalar_kind(field)
        ),
        FieldKind::Related(related) => {
            let target = &related.entity;
            let join_alias = optional_str(related.alias.as_deref());
            (
                quote! {
                    ::rowgraph_core::info::PropertyKind::Related {
                        entity: <#target as ::rowgraph_core::info::Entity>::entity_info,
                        alias: #join_alias
                    }
                },
                scalar_kind(field)
            )
        }
        FieldKind::Relation(relation) => {
            let target = &relation.target;
            let join_alias = &relation.alias;
            (
                quote! {
                    ::rowgraph_core::info::PropertyKind::Relation {
                        entity: <#target as ::rowgraph_core::info::Entity>::entity_info,
                        alias: ::core::option::Option::Some(#join_alias)
                    }
                },
                quote! { ::rowgraph_core::value::ValueKind::Null }
            )
        }
    };

    quote! {
        ::rowgraph_core::info::PropertyInfo {
            name: #name,
            column: #column,
            alias: #alias,
            flags: #flags,
            kind: #kind,
            value_kind: #value_kind,
            accessor: #accessor
        }
    }
}

fn scalar_kind(field: &FieldDef) -> TokenStream {
    let ty = &field.ty;
    quote! { <#ty as ::rowgraph_core::value::IntoValue>::KIND }
}

fn flags(field: &FieldDef) -> TokenStream {
    let mut flags = Vec::new();
    if field.is_id {
        flags.push(quote! { PRIMARY_KEY });
    }
    if field.is_auto {
        flags.push(quote! { IDENTITY_COLUMN });
    }
    if field.column.unique {
        flags.push(quote! { UNIQUE_KEY });
    }
    if field.is_mapped {
        flags.push(quote! { MAPPED_ATTRIBUTE });
    }

    quote! {
        ::rowgraph_core::attribute::AttributeFlags::NONE
            #(.union(::rowgraph_core::attribute::AttributeFlags::#flags))*
    }
}

fn optional_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: syn::DeriveInput) -> String {
        let entity = EntityDef::from_derive_input(&input).unwrap();
        generate(&entity).to_string()
    }

    #[test]
    fn location_overrides() {
        let code = expand(syn::parse_quote! {
            #[entity(table = "workflows", schema = "core")]
            pub struct Workflow {
                #[id]
                pub id: i64,
            }
        });
        assert!(code.contains("type_name : \"Workflow\""));
        assert!(code.contains("container : :: core :: option :: Option :: Some (\"core\")"));
        assert!(code.contains("name : :: core :: option :: Option :: Some (\"workflows\")"));
    }

    #[test]
    fn key_flags() {
        let code = expand(syn::parse_quote! {
            pub struct Workflow {
                #[id]
                #[auto]
                pub id: i64,
                #[column(unique)]
                pub code: String,
            }
        });
        assert!(code.contains("AttributeFlags :: PRIMARY_KEY"));
        assert!(code.contains("AttributeFlags :: IDENTITY_COLUMN"));
        assert!(code.contains("AttributeFlags :: UNIQUE_KEY"));
    }

    #[test]
    fn relation_uses_target_info() {
        let code = expand(syn::parse_quote! {
            pub struct Workflow {
                #[relation]
                pub created_by: Option<Arc<User>>,
            }
        });
        assert!(code.contains("PropertyKind :: Relation"));
        assert!(code.contains("< User as :: rowgraph_core :: info :: Entity > :: entity_info"));
        assert!(code.contains("Some (\"CreatedBy\")"));
        assert!(code.contains("ValueKind :: Null"));
    }

    #[test]
    fn related_column_is_recorded() {
        let code = expand(syn::parse_quote! {
            pub struct Workflow {
                #[related(User, alias = "Owner", column = "first_name")]
                pub owner_name: Option<String>,
            }
        });
        assert!(code.contains("PropertyKind :: Related"));
        assert!(code.contains("column : :: core :: option :: Option :: Some (\"first_name\")"));
    }

    #[test]
    fn skipped_fields_are_absent() {
        let code = expand(syn::parse_quote! {
            pub struct Field {
                pub id: i32,
                #[field(skip)]
                pub cache: Vec<u8>,
            }
        });
        assert!(code.contains("name : \"id\""));
        assert!(!code.contains("\"cache\""));
    }
}
