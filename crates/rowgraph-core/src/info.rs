// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Static entity metadata.
//!
//! `#[derive(Entity)]` emits one [`EntityInfo`] per struct. It is the
//! declarative input of definition resolution: the provider walks it to
//! produce [`EntityAttributeDefinition`](crate::EntityAttributeDefinition)s.
//!
//! The types are plain `'static` data so the macro can place them in a
//! `static` without lazy initialization. Manual implementations are possible
//! and are how the core crate tests itself.

use std::any::{Any, TypeId};

use crate::{accessor::Accessor, attribute::AttributeFlags, value::ValueKind};

/// A type whose rows can be materialized.
///
/// Implemented by `#[derive(Entity)]`. The type must also implement
/// [`Default`], which generated `construct` functions rely on.
pub trait Entity: Any + Send + Sync {
    /// Static metadata describing the entity.
    fn entity_info() -> &'static EntityInfo;
}

/// Macro-generated description of one entity type.
pub struct EntityInfo {
    /// Rust type name (e.g. `"Workflow"`).
    pub type_name:  &'static str,
    /// Type identity; `TypeId::of::<T>` in generated code.
    pub type_id:    fn() -> TypeId,
    /// Container (schema) override from `#[entity(schema = "..")]`.
    pub container:  Option<&'static str>,
    /// Entity (table) name override from `#[entity(table = "..")]`.
    pub name:       Option<&'static str>,
    /// Mapped properties in declaration order.
    pub properties: &'static [PropertyInfo],
    /// Creates a default instance for population.
    pub construct:  fn() -> Box<dyn Any + Send + Sync>
}

impl EntityInfo {
    /// Find a property by its Rust field name.
    pub fn property(&self, name: &str) -> Option<&'static PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Type identity of the described entity.
    pub fn id(&self) -> TypeId {
        (self.type_id)()
    }
}

impl std::fmt::Debug for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityInfo")
            .field("type_name", &self.type_name)
            .field("container", &self.container)
            .field("name", &self.name)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// Macro-generated description of one struct field.
pub struct PropertyInfo {
    /// Rust field name.
    pub name:       &'static str,
    /// Physical column override from `#[column(name = "..")]` or
    /// `#[related(.., column = "..")]`.
    pub column:     Option<&'static str>,
    /// Alias from `#[column(alias = "..")]`.
    pub alias:      Option<&'static str>,
    /// Key and mapping flags declared on the field.
    pub flags:      AttributeFlags,
    /// How the field participates in the entity graph.
    pub kind:       PropertyKind,
    /// Declared scalar kind; [`ValueKind::Null`] for relations.
    pub value_kind: ValueKind,
    /// Get/set trampolines. `None` only in hand-written metadata.
    pub accessor:   Option<Accessor>
}

impl std::fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("alias", &self.alias)
            .field("flags", &self.flags)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Role of a property in the entity graph.
#[derive(Clone, Copy)]
pub enum PropertyKind {
    /// A column of the declaring entity.
    Scalar,

    /// A column of another entity stored flat on the declaring type.
    ///
    /// Resolves through a *virtual* path node: the value belongs logically
    /// to `entity` (joined as `alias`) but is assigned on the declaring
    /// object.
    Related {
        /// Entity the column belongs to.
        entity: fn() -> &'static EntityInfo,
        /// Join alias of that entity.
        alias:  Option<&'static str>
    },

    /// A nested related object (`Option<Arc<T>>`).
    Relation {
        /// Related entity.
        entity: fn() -> &'static EntityInfo,
        /// Join alias of the related entity.
        alias:  Option<&'static str>
    }
}

impl PropertyKind {
    /// Check if this is a nested relation.
    pub const fn is_relation(&self) -> bool {
        matches!(self, Self::Relation { .. })
    }
}

impl std::fmt::Debug for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Related {
                entity,
                alias
            } => f
                .debug_struct("Related")
                .field("entity", &entity().type_name)
                .field("alias", alias)
                .finish(),
            Self::Relation {
                entity,
                alias
            } => f
                .debug_struct("Relation")
                .field("entity", &entity().type_name)
                .field("alias", alias)
                .finish()
        }
    }
}
