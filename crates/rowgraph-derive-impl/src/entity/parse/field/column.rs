// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column configuration from `#[column(...)]`.
//!
//! | Option | Effect |
//! |--------|--------|
//! | `name = ".."` | Physical column name |
//! | `alias = ".."` | Result column alias |
//! | `unique` | Adds `UNIQUE_KEY` |

use syn::{Attribute, LitStr, Meta};

/// Parsed `#[column(...)]` options.
#[derive(Debug, Default)]
pub struct ColumnConfig {
    /// Physical column name override.
    pub name: Option<String>,

    /// Result column alias.
    pub alias: Option<String>,

    /// Part of a unique key.
    pub unique: bool
}

impl ColumnConfig {
    /// Parse from a `#[column(...)]` attribute.
    ///
    /// A bare `#[column]` yields the default configuration.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        let mut config = Self::default();

        if let Meta::List(meta_list) = &attr.meta {
            meta_list.parse_nested_meta(|meta| {
                if meta.path.is_ident("unique") {
                    config.unique = true;
                } else if meta.path.is_ident("name") {
                    config.name = Some(non_empty(meta.value()?.parse()?)?);
                } else if meta.path.is_ident("alias") {
                    config.alias = Some(non_empty(meta.value()?.parse()?)?);
                } else {
                    return Err(meta.error("expected `name`, `alias` or `unique`"));
                }
                Ok(())
            })?;
        }

        Ok(config)
    }
}

pub(super) fn non_empty(lit: LitStr) -> syn::Result<String> {
    let value = lit.value();
    if value.is_empty() {
        return Err(syn::Error::new(lit.span(), "value must not be empty"));
    }
    Ok(value)
}
