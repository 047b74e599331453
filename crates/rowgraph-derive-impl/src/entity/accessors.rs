// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Get/set trampoline generation.
//!
//! Each mapped field gets a pair of non-capturing closures coerced to the
//! `fn` pointer types of [`Accessor`]. They downcast the `&dyn Any` entity
//! and convert through `IntoValue` / `FromValue`:
//!
//! ```rust,ignore
//! Accessor::Scalar {
//!     get: |entity| Ok(downcast::<Field>(entity, "Field", "name")?.name.to_value()),
//!     set: |entity, value| {
//!         downcast_mut::<Field>(entity, "Field", "name")?.name = FromValue::from_value(value)?;
//!         Ok(())
//!     }
//! }
//! ```
//!
//! Relation accessors exchange `Option<SharedEntity>` and recover the typed
//! `Arc<T>` with `downcast_shared`.
//!
//! [`Accessor`]: https://docs.rs/rowgraph-core/latest/rowgraph_core/accessor/enum.Accessor.html

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{EntityDef, FieldDef, FieldKind};
use crate::utils::types::type_label;

/// Generate `Some(Accessor::..)` for one field.
pub fn generate(entity: &EntityDef, field: &FieldDef) -> TokenStream {
    let owner = &entity.ident;
    let owner_name = entity.name_str();
    let ident = &field.ident;
    let property = field.name_str();

    let accessor = match &field.kind {
        FieldKind::Relation(relation) => {
            let target = &relation.target;
            let target_name = type_label(target);
            quote! {
                ::rowgraph_core::accessor::Accessor::Relation {
                    get: |entity| {
                        let owner = ::rowgraph_core::accessor::downcast::<#owner>(entity, #owner_name, #property)?;
                        ::core::result::Result::Ok(
                            owner
                                .#ident
                                .clone()
                                .map(|related| related as ::rowgraph_core::accessor::SharedEntity)
                        )
                    },
                    set: |entity, related| {
                        let owner = ::rowgraph_core::accessor::downcast_mut::<#owner>(entity, #owner_name, #property)?;
                        owner.#ident = related
                            .map(|shared| {
                                ::rowgraph_core::accessor::downcast_shared::<#target>(shared, #target_name, #property)
                            })
                            .transpose()?;
                        ::core::result::Result::Ok(())
                    }
                }
            }
        }
        FieldKind::Scalar | FieldKind::Related(_) => quote! {
            ::rowgraph_core::accessor::Accessor::Scalar {
                get: |entity| {
                    let owner = ::rowgraph_core::accessor::downcast::<#owner>(entity, #owner_name, #property)?;
                    ::core::result::Result::Ok(::rowgraph_core::value::IntoValue::to_value(&owner.#ident))
                },
                set: |entity, value| {
                    let owner = ::rowgraph_core::accessor::downcast_mut::<#owner>(entity, #owner_name, #property)?;
                    owner.#ident = ::rowgraph_core::value::FromValue::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            }
        }
    };

    quote! { ::core::option::Option::Some(#accessor) }
}
