// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Relation attributes.
//!
//! ```rust,ignore
//! #[relation]                          // alias = "CreatedBy"
//! pub created_by: Option<Arc<User>>,
//!
//! #[related(User, alias = "Owner", column = "first_name")]
//! pub owner_name: Option<String>,
//! ```

use syn::{Attribute, Meta, Path, Type};

use super::column::non_empty;

/// Nested `Option<Arc<T>>` relation.
#[derive(Debug)]
pub struct RelationConfig {
    /// Join alias; defaults to the field name in UpperCamelCase.
    pub alias: String,

    /// `T` of `Option<Arc<T>>`.
    pub target: Type
}

/// Column of another entity stored flat on the declaring one.
#[derive(Debug)]
pub struct RelatedConfig {
    /// Entity owning the column.
    pub entity: Path,

    /// Join alias of that entity.
    pub alias: Option<String>,

    /// Column of that entity; defaults to the field name.
    pub column: Option<String>
}

impl RelatedConfig {
    /// Parse from `#[related(Type, alias = "..", column = "..")]`.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        let Meta::List(meta_list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                attr,
                "expected `#[related(Type, ...)]`"
            ));
        };

        let mut entity: Option<Path> = None;
        let mut alias = None;
        let mut column = None;

        meta_list.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                alias = Some(non_empty(meta.value()?.parse()?)?);
            } else if meta.path.is_ident("column") {
                column = Some(non_empty(meta.value()?.parse()?)?);
            } else if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
                if entity.is_some() {
                    return Err(meta.error("related entity given twice"));
                }
                entity = Some(meta.path.clone());
            } else {
                return Err(meta.error("expected entity type, `alias` or `column`"));
            }
            Ok(())
        })?;

        let entity = entity.ok_or_else(|| {
            syn::Error::new_spanned(attr, "`#[related]` needs the entity type as first argument")
        })?;

        Ok(Self {
            entity,
            alias,
            column
        })
    }
}

/// Parse the optional alias of `#[relation]` / `#[relation(alias = "..")]`.
pub fn parse_relation_alias(attr: &Attribute) -> syn::Result<Option<String>> {
    let mut alias = None;

    if let Meta::List(meta_list) = &attr.meta {
        meta_list.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                alias = Some(non_empty(meta.value()?.parse()?)?);
                Ok(())
            } else {
                Err(meta.error("expected `alias`"))
            }
        })?;
    }

    Ok(alias)
}
