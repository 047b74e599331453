// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! # Attribute Quick Reference
//!
//! ## Entity-Level `#[entity(...)]`
//!
//! ```rust,ignore
//! #[derive(Entity, Default)]
//! #[entity(
//!     table = "workflows", // Optional: entity name (default: type name)
//!     schema = "core"      // Optional: container (default: resolver config)
//! )]
//! pub struct Workflow { /* ... */ }
//! ```
//!
//! ## Field-Level Attributes
//!
//! ```rust,ignore
//! pub struct Workflow {
//!     #[id]                                    // Primary key
//!     #[auto]                                  // Generated by the database
//!     pub id: i64,
//!
//!     #[column(name = "Name", unique)]         // Physical name, unique key
//!     pub name: String,
//!
//!     #[column(alias = "Title")]               // Result column alias
//!     pub title: Option<String>,
//!
//!     #[related(User, alias = "Owner", column = "first_name")]
//!     pub owner_name: Option<String>,          // Column of a joined entity
//!
//!     #[relation(alias = "CreatedBy")]         // Nested object
//!     pub created_by: Option<Arc<User>>,
//!
//!     #[mapped]                                // Metadata only, never returned
//!     pub revision: i32,
//!
//!     #[field(skip)]                           // Not mapped
//!     pub cache: Vec<u8>,
//! }
//! ```
//!
//! # Generated Code Overview
//!
//! | Generated Item | Description |
//! |----------------|-------------|
//! | `impl Entity for Workflow` | Static `EntityInfo` with property metadata |
//! | Accessors | `fn` trampolines reading and writing each mapped field |
//! | `Workflow::NAME` | `Property<Workflow, String>` for typed selections |
//! | `Workflow::CREATED_BY` | `Property<Workflow, Related<User>>`, chainable with `then` |

mod entity;
mod utils;

use proc_macro::TokenStream;

/// Derive macro producing entity metadata for rowgraph.
///
/// # Requirements
///
/// - Named-field struct without generic parameters
/// - `Default` implementation (used to construct instances during
///   materialization)
/// - `#[relation]` fields typed `Option<Arc<T>>` where `T: Entity`
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use rowgraph::prelude::*;
///
/// #[derive(Entity, Default)]
/// #[entity(schema = "auth")]
/// pub struct User {
///     #[id]
///     pub id: i32,
///     pub first_name: String,
/// }
///
/// #[derive(Entity, Default)]
/// pub struct Workflow {
///     #[id]
///     #[auto]
///     pub id: i64,
///     pub name: String,
///     #[relation(alias = "CreatedBy")]
///     pub created_by: Option<Arc<User>>,
/// }
///
/// let selection = AttributeSelection::new()
///     .select(Workflow::NAME)
///     .select(Workflow::CREATED_BY.then(User::FIRST_NAME));
/// ```
#[proc_macro_derive(
    Entity,
    attributes(entity, id, auto, column, relation, related, mapped, field)
)]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}
