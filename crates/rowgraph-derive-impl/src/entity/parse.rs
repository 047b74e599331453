// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for the Entity derive macro.
//!
//! Entity-level attributes use [`darling`]; field-level attributes are
//! marker-style and parsed by hand.
//!
//! # Architecture
//!
//! ```text
//! parse.rs (coordinator)
//! ├── entity.rs        - Entity-level parsing (EntityDef)
//! └── field.rs         - Field-level parsing (FieldDef)
//!     ├── column.rs    - #[column(name, alias, unique)]
//!     └── relation.rs  - #[relation(..)], #[related(..)]
//! ```
//!
//! # Data Structures
//!
//! ```text
//! EntityDef
//! ├── ident: Ident              (struct name, e.g., "Workflow")
//! ├── vis: Visibility
//! ├── table: Option<String>     (entity name override)
//! ├── schema: Option<String>    (container override)
//! └── fields: Vec<FieldDef>
//!     └── FieldDef
//!         ├── ident: Ident
//!         ├── ty: Type
//!         ├── is_id / is_auto / is_mapped / skip
//!         ├── column: ColumnConfig
//!         └── kind: FieldKind   (Scalar | Related | Relation)
//! ```

mod entity;
mod field;

pub use entity::EntityDef;
pub use field::{FieldDef, FieldKind};
