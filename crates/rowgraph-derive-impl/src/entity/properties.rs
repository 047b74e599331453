// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed property constant generation.
//!
//! One associated constant per selectable field, named in
//! SCREAMING_SNAKE_CASE:
//!
//! ```rust,ignore
//! impl Workflow {
//!     pub const NAME: Property<Workflow, String> = Property::new("name");
//!     pub const CREATED_BY: Property<Workflow, Related<User>> = Property::new("created_by");
//! }
//! ```
//!
//! `Related<T>` constants chain with `then` into paths through the related
//! entity. `#[mapped]` fields are never returned and get no constant.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{EntityDef, FieldDef, FieldKind};

/// Generate the inherent `impl` with property constants.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let constants: Vec<TokenStream> = entity
        .mapped_fields()
        .filter(|field| !field.is_mapped)
        .map(|field| constant(entity, field))
        .collect();

    if constants.is_empty() {
        return TokenStream::new();
    }

    quote! {
        impl #ident {
            #(#constants)*
        }
    }
}

fn constant(entity: &EntityDef, field: &FieldDef) -> TokenStream {
    let owner = &entity.ident;
    let vis = &entity.vis;
    let const_name = field.const_name();
    let name = field.name_str();
    let doc = field.doc.clone().unwrap_or_else(|| {
        if field.is_relation() {
            format!("Navigation to `{}.{name}`.", entity.name_str())
        } else {
            format!("Selects `{}.{name}`.", entity.name_str())
        }
    });

    let value = match &field.kind {
        FieldKind::Relation(relation) => {
            let target = &relation.target;
            quote! { ::rowgraph_core::selection::Related<#target> }
        }
        FieldKind::Scalar | FieldKind::Related(_) => {
            let ty = &field.ty;
            quote! { #ty }
        }
    };

    quote! {
        #[doc = #doc]
        #vis const #const_name: ::rowgraph_core::selection::Property<#owner, #value> =
            ::rowgraph_core::selection::Property::new(#name);
    }
}
