// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-level attribute parsing.
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `table` | No | type name | Entity (table) name |
//! | `schema` | No | resolver default | Container (schema) |

use darling::FromDeriveInput;
use syn::{DeriveInput, Ident, Visibility};

use super::field::FieldDef;

/// Entity-level attributes parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
struct EntityAttrs {
    ident: Ident,

    vis: Visibility,

    generics: syn::Generics,

    #[darling(default)]
    table: Option<String>,

    #[darling(default)]
    schema: Option<String>
}

/// Complete parsed entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier (e.g., `Workflow`).
    pub ident: Ident,

    /// Struct visibility; property constants share it.
    pub vis: Visibility,

    /// Entity name override.
    pub table: Option<String>,

    /// Container override.
    pub schema: Option<String>,

    /// Every named field, skipped ones included.
    pub fields: Vec<FieldDef>
}

impl EntityDef {
    /// Parse entity definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union or tuple struct
    /// - Struct has generic parameters
    /// - Empty `table` or `schema`
    /// - Invalid field attributes (see [`FieldDef::from_field`])
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;
        let mut errors = darling::Error::accumulator();

        if !attrs.generics.params.is_empty() {
            errors.push(
                darling::Error::custom("Entity cannot be derived for generic structs")
                    .with_span(&attrs.generics)
            );
        }
        for (key, value) in [("table", &attrs.table), ("schema", &attrs.schema)] {
            if value.as_deref().is_some_and(str::is_empty) {
                errors.push(
                    darling::Error::custom(format!("`{key}` must not be empty")).with_span(&attrs.ident)
                );
            }
        }

        let fields = match &input.data {
            syn::Data::Struct(data) => data
                .fields
                .iter()
                .filter_map(|field| errors.handle(FieldDef::from_field(field)))
                .collect(),
            _ => Vec::new()
        };

        errors.finish()?;

        Ok(Self {
            ident: attrs.ident,
            vis: attrs.vis,
            table: attrs.table,
            schema: attrs.schema,
            fields
        })
    }

    /// Struct name as a string.
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Fields that take part in mapping.
    pub fn mapped_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.skip)
    }
}
