// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core types for rowgraph.
//!
//! This crate resolves entity metadata into attribute definitions and maps
//! tabular rows back into object graphs. `rowgraph` re-exports it together
//! with `#[derive(Entity)]`; it can also be used standalone with hand-written
//! [`EntityInfo`].
//!
//! # Overview
//!
//! - [`EntityDefinitionProvider`] — Resolves an [`EntityReference`] into an
//!   [`EntityDefinition`]
//! - [`DerivedDefinitionProvider`] — Provider backed by [`Entity`] metadata
//! - [`Materializer`] — Turns [`RowReader`] rows into entities or
//!   [`DynamicRecord`]s
//! - [`AttributeSelection`] — Typed subset of attributes to materialize
//! - [`prelude`] — Convenient re-exports
//!
//! # Pipeline
//!
//! ```text
//! #[derive(Entity)] ──► EntityInfo ──► DerivedDefinitionProvider
//!                                            │ resolve (cached)
//!                                            ▼
//!                                     EntityDefinition
//!                                            │ + selection + columns
//!                                            ▼
//! RowReader ──────────────────────────► Materializer ──► T / DynamicRecord
//!                                       (PlanCache, IdentityCache)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use rowgraph_core::prelude::*;
//!
//! let materializer = Materializer::new(Arc::new(DerivedDefinitionProvider::new()));
//! let workflows: Vec<Workflow> = materializer.rows(reader).collect::<Result<_, _>>()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod attribute;
pub mod config;
pub mod definition;
pub mod error;
pub mod info;
pub mod location;
pub mod materialize;
pub mod prelude;
pub mod provider;
pub mod reader;
pub mod selection;
pub mod value;

#[cfg(test)]
mod test_fixtures;

pub use accessor::{Accessor, AccessorCache, SharedEntity};
pub use attribute::{AttributeFlags, EntityAttributeDefinition, EntityAttributeInstance};
pub use config::{MaterializerConfig, NullSuppression, ResolverConfig};
pub use definition::EntityDefinition;
pub use error::{AccessError, ConversionError, DefinitionError, MaterializeError, ReaderError};
pub use info::{Entity, EntityInfo, PropertyInfo, PropertyKind};
pub use location::{AttributeLocation, EntityLocation, EntityReference, EntityType};
pub use materialize::{
    DynamicField, DynamicRecord, DynamicRows, IdentityCache, MaterializedRow, Materializer, PlanCache,
    RowShape, Rows
};
pub use provider::{DefinitionCache, DerivedDefinitionProvider, EntityDefinitionProvider};
#[cfg(feature = "postgres")]
pub use reader::PgRowReader;
pub use reader::{MemoryRowReader, RowReader};
pub use selection::{AttributePath, AttributeSelection, Property, PropertyPath, Related, Selectable};
pub use value::{FromValue, IntoValue, Value, ValueKind};
