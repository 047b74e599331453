// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity and attribute locations.
//!
//! Small immutable value types that identify *where* an attribute lives:
//!
//! | Type | Identifies |
//! |------|-----------|
//! | [`EntityType`] | a Rust entity type (by `TypeId`) |
//! | [`EntityReference`] | an entity as requested by a query: type, alias, enclosing type |
//! | [`EntityLocation`] | a resolved node of the entity graph: container, name, alias |
//! | [`AttributeLocation`] | a property of a referenced entity; filter and update-set key |

use std::{
    any::TypeId,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher}
};

use crate::info::{Entity, EntityInfo};

/// Identity of an entity type.
///
/// Wraps the macro-generated metadata. Equality and hashing use the
/// `TypeId`; ordering uses the type name first so sorted output is stable
/// across builds.
#[derive(Clone, Copy)]
pub struct EntityType(&'static EntityInfo);

impl EntityType {
    /// Entity type of `T`.
    pub fn of<T: Entity>() -> Self {
        Self(T::entity_info())
    }

    /// Wrap existing metadata.
    pub const fn from_info(info: &'static EntityInfo) -> Self {
        Self(info)
    }

    /// Underlying metadata.
    pub const fn info(&self) -> &'static EntityInfo {
        self.0
    }

    /// Type identity.
    pub fn id(&self) -> TypeId {
        self.0.id()
    }

    /// Rust type name.
    pub const fn name(&self) -> &'static str {
        self.0.type_name
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl PartialOrd for EntityType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.id().cmp(&other.id()))
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityType").field(&self.name()).finish()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of an entity graph as seen from a query root.
///
/// A *virtual* node marks an entity whose columns are flattened onto the
/// preceding real node (explicit related attributes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityLocation {
    entity_type: EntityType,
    container:   String,
    name:        String,
    alias:       Option<String>,
    is_virtual:  bool
}

impl EntityLocation {
    /// Create a non-virtual location without alias.
    pub fn new(entity_type: EntityType, container: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity_type,
            container: container.into(),
            name: name.into(),
            alias: None,
            is_virtual: false
        }
    }

    /// Set the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark the location as virtual.
    #[must_use]
    pub fn into_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Entity type at this node.
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Container (schema) name.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Entity (table) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Alias if set, otherwise the entity name.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Check if this node is virtual.
    pub const fn is_virtual(&self) -> bool {
        self.is_virtual
    }
}

impl fmt::Display for EntityLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.container, self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// An entity as referenced by a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityReference {
    entity_type:    EntityType,
    alias:          Option<String>,
    container_type: Option<EntityType>
}

impl EntityReference {
    /// Reference `T` without alias.
    pub fn of<T: Entity>() -> Self {
        Self::new(EntityType::of::<T>())
    }

    /// Reference an entity type without alias.
    pub const fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            alias: None,
            container_type: None
        }
    }

    /// Set the query alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Record the enclosing entity type.
    #[must_use]
    pub fn within<C: Entity>(mut self) -> Self {
        self.container_type = Some(EntityType::of::<C>());
        self
    }

    /// Referenced entity type.
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Query alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Enclosing entity type, if any.
    pub const fn container_type(&self) -> Option<EntityType> {
        self.container_type
    }
}

/// A property of a referenced entity.
///
/// Equality is by property name and entity reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeLocation {
    property: &'static str,
    entity:   EntityReference
}

impl AttributeLocation {
    /// Locate `property` on `entity`.
    pub const fn new(property: &'static str, entity: EntityReference) -> Self {
        Self {
            property,
            entity
        }
    }

    /// Locate `property` on an unaliased `E`.
    pub fn of<E: Entity>(property: &'static str) -> Self {
        Self::new(property, EntityReference::of::<E>())
    }

    /// Property name.
    pub const fn property(&self) -> &'static str {
        self.property
    }

    /// Entity reference.
    pub const fn entity(&self) -> &EntityReference {
        &self.entity
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::test_fixtures::{Field, User, Workflow};

    #[test]
    fn entity_type_identity() {
        assert_eq!(EntityType::of::<Field>(), EntityType::of::<Field>());
        assert_ne!(EntityType::of::<Field>(), EntityType::of::<User>());
        assert_eq!(EntityType::of::<User>().name(), "User");
        assert_eq!(format!("{:?}", EntityType::of::<User>()), "EntityType(\"User\")");
    }

    #[test]
    fn entity_type_orders_by_name() {
        let mut types = vec![
            EntityType::of::<Workflow>(),
            EntityType::of::<Field>(),
            EntityType::of::<User>()
        ];
        types.sort();
        let names: Vec<_> = types.iter().map(EntityType::name).collect();
        assert_eq!(names, ["Field", "User", "Workflow"]);
    }

    #[test]
    fn location_equality_covers_alias_and_virtual() {
        let base = EntityLocation::new(EntityType::of::<User>(), "public", "users");
        let aliased = base.clone().with_alias("CreatedBy");
        assert_ne!(base, aliased);
        assert_ne!(aliased, aliased.clone().into_virtual());
        assert_eq!(aliased.reference_name(), "CreatedBy");
        assert_eq!(base.reference_name(), "users");
        assert_eq!(aliased.to_string(), "public.users AS CreatedBy");
    }

    #[test]
    fn reference_builder() {
        let reference = EntityReference::of::<User>()
            .with_alias("CreatedBy")
            .within::<Workflow>();
        assert_eq!(reference.alias(), Some("CreatedBy"));
        assert_eq!(reference.container_type(), Some(EntityType::of::<Workflow>()));
        assert_ne!(reference, EntityReference::of::<User>());
    }

    #[test]
    fn attribute_location_is_a_map_key() {
        let mut set = HashSet::new();
        set.insert(AttributeLocation::of::<Field>("name"));
        set.insert(AttributeLocation::of::<Field>("name"));
        set.insert(AttributeLocation::new(
            "name",
            EntityReference::of::<Field>().with_alias("f")
        ));
        assert_eq!(set.len(), 2);
    }
}
