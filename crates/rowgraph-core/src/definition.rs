// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved entity definitions.
//!
//! An [`EntityDefinition`] is the read-only facade over every attribute
//! resolved for one [`EntityReference`]. Filtered views are computed on
//! first use and cached for the lifetime of the definition.
//!
//! | View | Contents |
//! |------|----------|
//! | [`all_attributes`](EntityDefinition::all_attributes) | everything, relations and mapped attributes included |
//! | [`returnable_attributes`](EntityDefinition::returnable_attributes) | all minus metadata |
//! | [`direct_attributes`](EntityDefinition::direct_attributes) | returnable and owned by the root |
//! | [`primary_key_attributes`](EntityDefinition::primary_key_attributes) | direct primary key columns |
//! | [`updateable_attributes`](EntityDefinition::updateable_attributes) | direct minus keys and identity columns |
//! | [`relation_attributes`](EntityDefinition::relation_attributes) | relation navigations |
//!
//! Lookups return [`EntityAttributeDefinition::empty`] when nothing matches.

use std::{any::Any, fmt};

use once_cell::sync::OnceCell;

use crate::{
    attribute::{EntityAttributeDefinition, EntityAttributeInstance},
    error::AccessError,
    location::{AttributeLocation, EntityLocation, EntityReference, EntityType}
};

/// All attributes of one referenced entity.
pub struct EntityDefinition {
    reference:  EntityReference,
    location:   EntityLocation,
    attributes: Vec<EntityAttributeDefinition>,
    returnable: OnceCell<Vec<EntityAttributeDefinition>>,
    direct:     OnceCell<Vec<EntityAttributeDefinition>>,
    keys:       OnceCell<Vec<EntityAttributeDefinition>>,
    updateable: OnceCell<Vec<EntityAttributeDefinition>>,
    relations:  OnceCell<Vec<EntityAttributeDefinition>>
}

impl EntityDefinition {
    /// Wrap resolved attributes.
    pub fn new(
        reference: EntityReference,
        location: EntityLocation,
        attributes: Vec<EntityAttributeDefinition>
    ) -> Self {
        Self {
            reference,
            location,
            attributes,
            returnable: OnceCell::new(),
            direct: OnceCell::new(),
            keys: OnceCell::new(),
            updateable: OnceCell::new(),
            relations: OnceCell::new()
        }
    }

    /// Reference this definition was resolved for.
    pub const fn reference(&self) -> &EntityReference {
        &self.reference
    }

    /// Root entity type.
    pub const fn entity_type(&self) -> EntityType {
        self.reference.entity_type()
    }

    /// Location of the root entity.
    pub const fn location(&self) -> &EntityLocation {
        &self.location
    }

    /// Every resolved attribute in ordinal order.
    pub fn all_attributes(&self) -> &[EntityAttributeDefinition] {
        &self.attributes
    }

    /// Attributes that carry row values.
    pub fn returnable_attributes(&self) -> &[EntityAttributeDefinition] {
        self.returnable.get_or_init(|| retain(&self.attributes, |a| !a.is_metadata()))
    }

    /// Returnable attributes owned by the root.
    pub fn direct_attributes(&self) -> &[EntityAttributeDefinition] {
        self.direct
            .get_or_init(|| retain(self.returnable_attributes(), EntityAttributeDefinition::is_direct))
    }

    /// Direct primary key columns.
    pub fn primary_key_attributes(&self) -> &[EntityAttributeDefinition] {
        self.keys
            .get_or_init(|| retain(self.direct_attributes(), EntityAttributeDefinition::is_primary_key))
    }

    /// First direct auto-number primary key, or the empty sentinel.
    pub fn auto_number_primary_key(&self) -> &EntityAttributeDefinition {
        self.primary_key_attributes()
            .iter()
            .find(|a| a.is_identity_column())
            .unwrap_or(EntityAttributeDefinition::empty())
    }

    /// Direct attributes an update may assign.
    pub fn updateable_attributes(&self) -> &[EntityAttributeDefinition] {
        self.updateable.get_or_init(|| {
            retain(self.direct_attributes(), |a| {
                !a.is_primary_key() && !a.is_identity_column()
            })
        })
    }

    /// Relation navigations.
    pub fn relation_attributes(&self) -> &[EntityAttributeDefinition] {
        self.relations
            .get_or_init(|| retain(&self.attributes, EntityAttributeDefinition::is_relation))
    }

    /// Find by property path from the root.
    pub fn find_by_path(&self, path: &[&str]) -> &EntityAttributeDefinition {
        self.first(|a| a.property_path() == path)
    }

    /// Find by dotted property path (`"created_by.first_name"`).
    pub fn find_by_dotted_path(&self, path: &str) -> &EntityAttributeDefinition {
        let segments: Vec<&str> = path.split('.').collect();
        self.find_by_path(&segments)
    }

    /// Find by entity alias or name and property name.
    pub fn find(&self, entity_name: &str, property_name: &str) -> &EntityAttributeDefinition {
        self.first(|a| {
            a.property_name() == property_name
                && [a.entity(), a.reference_node()]
                    .into_iter()
                    .flatten()
                    .any(|node| node.reference_name() == entity_name || node.name() == entity_name)
        })
    }

    /// Find by attribute location.
    ///
    /// An unaliased location matches any node of the referenced type.
    pub fn find_by_location(&self, location: &AttributeLocation) -> &EntityAttributeDefinition {
        let wanted = location.entity();
        self.first(|a| {
            a.property_name() == location.property()
                && a.entity().is_some_and(|node| {
                    node.entity_type() == wanted.entity_type()
                        && wanted.alias().is_none_or(|alias| node.alias() == Some(alias))
                })
        })
    }

    /// Find by result column name.
    pub fn find_by_result_name(&self, name: &str) -> &EntityAttributeDefinition {
        self.first(|a| !a.is_metadata() && a.result_name() == name)
    }

    /// Non-null values of the returnable attributes of `root`.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if `root` is not the root entity type.
    pub fn instances(&self, root: &dyn Any) -> Result<Vec<EntityAttributeInstance>, AccessError> {
        let mut out = Vec::with_capacity(self.returnable_attributes().len());
        for attribute in self.returnable_attributes() {
            let value = attribute.read_value(root)?;
            if !value.is_null() {
                out.push(EntityAttributeInstance::new(attribute.clone(), value));
            }
        }
        Ok(out)
    }

    fn first(&self, predicate: impl Fn(&EntityAttributeDefinition) -> bool) -> &EntityAttributeDefinition {
        self.attributes
            .iter()
            .find(|a| predicate(a))
            .unwrap_or(EntityAttributeDefinition::empty())
    }
}

fn retain(
    source: &[EntityAttributeDefinition],
    predicate: impl Fn(&EntityAttributeDefinition) -> bool
) -> Vec<EntityAttributeDefinition> {
    source.iter().filter(|a| predicate(a)).cloned().collect()
}

impl fmt::Debug for EntityDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDefinition")
            .field("location", &self.location)
            .field("attributes", &self.attributes.len())
            .finish_non_exhaustive()
    }
}
