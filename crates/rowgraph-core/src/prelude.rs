// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rowgraph_core::prelude::*;
//! ```

pub use std::sync::Arc;

pub use crate::{
    AttributePath, AttributeSelection, DerivedDefinitionProvider, DynamicRecord, Entity,
    EntityDefinition, EntityDefinitionProvider, EntityReference, IdentityCache, MaterializeError,
    MaterializedRow, Materializer, MaterializerConfig, MemoryRowReader, NullSuppression, Property,
    Related, ResolverConfig, RowReader, RowShape, Value
};
