// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # rowgraph
//!
//! One crate, all features. Re-exports:
//! - [`Entity`] derive macro from `rowgraph-derive-impl`
//! - All types from `rowgraph-core` ([`Materializer`],
//!   [`DerivedDefinitionProvider`], [`AttributeSelection`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rowgraph::prelude::*;
//!
//! #[derive(Entity, Default)]
//! pub struct Field {
//!     #[id]
//!     #[column(name = "Id")]
//!     pub id: i32,
//!     #[column(name = "Name")]
//!     pub name: String,
//! }
//!
//! let materializer = Materializer::new(Arc::new(DerivedDefinitionProvider::new()));
//! let fields: Vec<Field> = materializer.rows(reader).collect::<Result<_, _>>()?;
//! ```

pub use rowgraph_core::*;
pub use rowgraph_derive_impl::Entity;

/// Convenient re-exports, including the derive macro.
pub mod prelude {
    pub use rowgraph_core::prelude::*;
    pub use rowgraph_derive_impl::Entity;
}
