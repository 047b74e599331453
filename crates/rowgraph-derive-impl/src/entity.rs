// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity derive macro implementation.
//!
//! # Architecture
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse/         → Attribute parsing (EntityDef, FieldDef)
//! │
//! ├── info.rs        → impl Entity with the static EntityInfo
//! ├── accessors.rs   → get/set trampolines per field
//! └── properties.rs  → typed Property constants
//! ```
//!
//! # Generated Code
//!
//! For an entity like:
//!
//! ```rust,ignore
//! #[derive(Entity, Default)]
//! pub struct Field {
//!     #[id]
//!     pub id: i32,
//!     #[column(name = "Name")]
//!     pub name: String,
//! }
//! ```
//!
//! The macro generates:
//!
//! | Item | Purpose |
//! |------|---------|
//! | `impl Entity for Field` | Metadata consumed by definition resolution |
//! | `Field::ID`, `Field::NAME` | Typed selection paths |

mod accessors;
pub mod parse;
mod info;
mod properties;

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::EntityDef;

/// Main entry point for the Entity derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EntityDef::from_derive_input(&input) {
        Ok(entity) => generate(&entity),
        Err(err) => err.write_errors().into()
    }
}

fn generate(entity: &EntityDef) -> TokenStream {
    let info = info::generate(entity);
    let properties = properties::generate(entity);

    let expanded = quote! {
        #info
        #properties
    };

    expanded.into()
}
