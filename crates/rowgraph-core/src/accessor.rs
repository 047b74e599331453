// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Property accessor bindings.
//!
//! The derive macro generates a get and a set trampoline per field and
//! stores them in [`PropertyInfo::accessor`](crate::PropertyInfo). The
//! trampolines take the entity as `&dyn Any` so the materializer can drive
//! any entity type through the same plan.
//!
//! [`AccessorCache`] memoizes the `(declaring type, property)` lookup so a
//! binding is resolved once per process (or per cache instance) and then
//! copied into every definition that needs it.

use std::{
    any::{Any, TypeId},
    sync::Arc
};

use dashmap::DashMap;
use tracing::trace;

use crate::{
    error::{AccessError, DefinitionError},
    info::EntityInfo,
    value::Value
};

/// A populated entity shared between rows of one read pass.
pub type SharedEntity = Arc<dyn Any + Send + Sync>;

/// Reads a scalar property.
pub type ScalarGetter = fn(&dyn Any) -> Result<Value, AccessError>;
/// Assigns a scalar property.
pub type ScalarSetter = fn(&mut dyn Any, Value) -> Result<(), AccessError>;
/// Reads a nested relation.
pub type RelationGetter = fn(&dyn Any) -> Result<Option<SharedEntity>, AccessError>;
/// Assigns a nested relation.
pub type RelationSetter = fn(&mut dyn Any, Option<SharedEntity>) -> Result<(), AccessError>;

/// Get/set pair for one property.
#[derive(Clone, Copy)]
pub enum Accessor {
    /// Column-backed property.
    Scalar {
        /// Getter trampoline.
        get: ScalarGetter,
        /// Setter trampoline.
        set: ScalarSetter
    },
    /// `Option<Arc<T>>` relation property.
    Relation {
        /// Getter trampoline.
        get: RelationGetter,
        /// Setter trampoline.
        set: RelationSetter
    }
}

impl Accessor {
    /// Check if this accessor targets a relation.
    pub const fn is_relation(&self) -> bool {
        matches!(self, Self::Relation { .. })
    }
}

impl std::fmt::Debug for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar { .. } => f.write_str("Accessor::Scalar"),
            Self::Relation { .. } => f.write_str("Accessor::Relation")
        }
    }
}

/// Downcast helper used by generated getters.
pub fn downcast<'a, T: Any>(
    entity: &'a dyn Any,
    type_name: &'static str,
    property: &'static str
) -> Result<&'a T, AccessError> {
    entity.downcast_ref::<T>().ok_or(AccessError::TypeMismatch {
        expected: type_name,
        property
    })
}

/// Downcast helper used by generated setters.
pub fn downcast_mut<'a, T: Any>(
    entity: &'a mut dyn Any,
    type_name: &'static str,
    property: &'static str
) -> Result<&'a mut T, AccessError> {
    entity.downcast_mut::<T>().ok_or(AccessError::TypeMismatch {
        expected: type_name,
        property
    })
}

/// Recover a typed `Arc` from a [`SharedEntity`] in relation setters.
pub fn downcast_shared<T: Any + Send + Sync>(
    entity: SharedEntity,
    type_name: &'static str,
    property: &'static str
) -> Result<Arc<T>, AccessError> {
    entity.downcast::<T>().map_err(|_| AccessError::TypeMismatch {
        expected: type_name,
        property
    })
}

/// Process- or application-scoped memo of accessor bindings.
///
/// Keyed by `(TypeId, property name)`. Racing first lookups may bind twice;
/// the first inserted binding wins and every caller observes it.
#[derive(Debug, Default)]
pub struct AccessorCache {
    bindings: DashMap<(TypeId, &'static str), Accessor>
}

impl AccessorCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the accessor for `property` on `info`, or reuse the cached one.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::MissingAccessor`] if the property is unknown or
    /// carries no accessor.
    pub fn bind(
        &self,
        info: &'static EntityInfo,
        property: &'static str
    ) -> Result<Accessor, DefinitionError> {
        let key = (info.id(), property);
        if let Some(found) = self.bindings.get(&key) {
            trace!(entity = info.type_name, property, "accessor cache hit");
            return Ok(*found);
        }

        let accessor = info
            .property(property)
            .and_then(|p| p.accessor)
            .ok_or(DefinitionError::MissingAccessor {
                entity: info.type_name,
                property
            })?;

        Ok(*self.bindings.entry(key).or_insert(accessor))
    }

    /// Number of bound `(type, property)` pairs.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        info::Entity,
        test_fixtures::{Field, Unreadable}
    };

    #[test]
    fn bind_is_memoized_per_type_and_property() {
        let cache = AccessorCache::new();
        cache.bind(Field::entity_info(), "name").unwrap();
        cache.bind(Field::entity_info(), "name").unwrap();
        cache.bind(Field::entity_info(), "description").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn bound_accessor_reads_and_writes() {
        let cache = AccessorCache::new();
        let Accessor::Scalar {
            get,
            set
        } = cache.bind(Field::entity_info(), "name").unwrap()
        else {
            panic!("expected scalar accessor");
        };

        let mut field = Field::default();
        set(&mut field, Value::Text("MahField".into())).unwrap();
        assert_eq!(field.name, "MahField");
        assert_eq!(get(&field).unwrap(), Value::Text("MahField".into()));
    }

    #[test]
    fn accessor_rejects_foreign_entity() {
        let cache = AccessorCache::new();
        let Accessor::Scalar {
            get, ..
        } = cache.bind(Field::entity_info(), "name").unwrap()
        else {
            panic!("expected scalar accessor");
        };

        let err = get(&42_u8).unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                expected: "Field",
                property: "name"
            }
        );
    }

    #[test]
    fn missing_accessor_is_definition_error() {
        let cache = AccessorCache::new();
        let err = cache.bind(Unreadable::entity_info(), "secret").unwrap_err();
        assert_eq!(
            err,
            DefinitionError::MissingAccessor {
                entity:   "Unreadable",
                property: "secret"
            }
        );
        assert!(cache.is_empty());
    }
}
