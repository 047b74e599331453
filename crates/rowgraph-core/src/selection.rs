// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed property paths and attribute selections.
//!
//! `#[derive(Entity)]` generates one associated constant per mapped field:
//!
//! ```rust,ignore
//! Workflow::NAME                              // Property<Workflow, String>
//! Workflow::CREATED_BY                        // Property<Workflow, Related<User>>
//! Workflow::CREATED_BY.then(User::FIRST_NAME) // PropertyPath<Workflow, String>
//! ```
//!
//! `then` only exists on relation properties, so a path can never step
//! through a scalar. An [`AttributeSelection`] collects paths for one root
//! entity and resolves them against its definition.

use std::{fmt, marker::PhantomData};

use crate::{
    attribute::EntityAttributeDefinition,
    definition::EntityDefinition,
    error::MaterializeError
};

/// Value marker for relation properties.
pub struct Related<T>(PhantomData<fn() -> T>);

/// A mapped field of `E` whose value type is `V`.
pub struct Property<E, V> {
    name:    &'static str,
    _marker: PhantomData<fn() -> (E, V)>
}

impl<E, V> Property<E, V> {
    /// Create a property handle. Used by generated code.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData
        }
    }

    /// Rust field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Untyped single-segment path.
    pub fn path(&self) -> AttributePath {
        AttributePath::new(vec![self.name])
    }
}

impl<E, T> Property<E, Related<T>> {
    /// Continue the path into the related entity.
    pub fn then<V>(self, next: Property<T, V>) -> PropertyPath<E, V> {
        PropertyPath {
            segments: vec![self.name, next.name],
            _marker:  PhantomData
        }
    }
}

impl<E, V> Clone for Property<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for Property<E, V> {}

impl<E, V> fmt::Debug for Property<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&self.name).finish()
    }
}

/// A multi-segment path from `E` to a value of type `V`.
pub struct PropertyPath<E, V> {
    segments: Vec<&'static str>,
    _marker:  PhantomData<fn() -> (E, V)>
}

impl<E, V> PropertyPath<E, V> {
    /// Property names from the root.
    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// Untyped form.
    pub fn path(&self) -> AttributePath {
        AttributePath::new(self.segments.clone())
    }
}

impl<E, T> PropertyPath<E, Related<T>> {
    /// Continue the path into the related entity.
    pub fn then<V>(mut self, next: Property<T, V>) -> PropertyPath<E, V> {
        self.segments.push(next.name);
        PropertyPath {
            segments: self.segments,
            _marker:  PhantomData
        }
    }
}

impl<E, V> Clone for PropertyPath<E, V> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            _marker:  PhantomData
        }
    }
}

impl<E, V> fmt::Debug for PropertyPath<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyPath").field(&self.segments.join(".")).finish()
    }
}

/// Untyped property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    segments: Vec<&'static str>
}

impl AttributePath {
    /// Path from property names.
    pub const fn new(segments: Vec<&'static str>) -> Self {
        Self {
            segments
        }
    }

    /// Path from a dotted string (`"created_by.first_name"`).
    pub fn from_dotted(path: &'static str) -> Self {
        Self::new(path.split('.').collect())
    }

    /// Property names from the root.
    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// Check if `other` starts with this path.
    pub fn is_prefix_of(&self, other: &[&str]) -> bool {
        other.len() >= self.segments.len() && other[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl<E, V> From<Property<E, V>> for AttributePath {
    fn from(property: Property<E, V>) -> Self {
        property.path()
    }
}

impl<E, V> From<PropertyPath<E, V>> for AttributePath {
    fn from(path: PropertyPath<E, V>) -> Self {
        Self::new(path.segments)
    }
}

/// Anything that names a path rooted at `E`.
pub trait Selectable<E> {
    /// Untyped form.
    fn into_path(self) -> AttributePath;
}

impl<E, V> Selectable<E> for Property<E, V> {
    fn into_path(self) -> AttributePath {
        self.path()
    }
}

impl<E, V> Selectable<E> for PropertyPath<E, V> {
    fn into_path(self) -> AttributePath {
        self.into()
    }
}

/// Attributes requested for a root entity `E`.
///
/// Selecting a relation selects every returnable attribute beneath it.
pub struct AttributeSelection<E> {
    paths:   Option<Vec<AttributePath>>,
    _marker: PhantomData<fn() -> E>
}

impl<E> AttributeSelection<E> {
    /// Every returnable attribute.
    pub const fn all() -> Self {
        Self {
            paths:   None,
            _marker: PhantomData
        }
    }

    /// Empty explicit selection.
    pub const fn new() -> Self {
        Self {
            paths:   Some(Vec::new()),
            _marker: PhantomData
        }
    }

    /// Add a typed path.
    #[must_use]
    pub fn select(self, path: impl Selectable<E>) -> Self {
        self.select_path(path.into_path())
    }

    /// Add an untyped path.
    #[must_use]
    pub fn select_path(mut self, path: AttributePath) -> Self {
        self.paths.get_or_insert_with(Vec::new).push(path);
        self
    }

    /// Check if this selects every returnable attribute.
    pub const fn is_all(&self) -> bool {
        self.paths.is_none()
    }

    /// Explicitly selected paths; empty for [`all`](Self::all).
    pub fn paths(&self) -> &[AttributePath] {
        self.paths.as_deref().unwrap_or_default()
    }

    /// Resolve the selection to attribute definitions in selection order.
    ///
    /// # Errors
    ///
    /// [`MaterializeError::AttributeNotFound`] for a path that names no
    /// returnable attribute or relation.
    pub fn resolve<'d>(
        &self,
        definition: &'d EntityDefinition
    ) -> Result<Vec<&'d EntityAttributeDefinition>, MaterializeError> {
        let Some(paths) = &self.paths else {
            return Ok(definition.returnable_attributes().iter().collect());
        };

        let mut selected: Vec<&'d EntityAttributeDefinition> = Vec::new();
        for path in paths {
            let found = definition.find_by_path(path.segments());
            if found.is_relation() {
                let beneath = definition
                    .returnable_attributes()
                    .iter()
                    .filter(|a| path.is_prefix_of(a.property_path()));
                for attribute in beneath {
                    push_unique(&mut selected, attribute);
                }
            } else if found.is_empty() || found.is_metadata() {
                return Err(MaterializeError::AttributeNotFound(path.to_string()));
            } else {
                push_unique(&mut selected, found);
            }
        }
        Ok(selected)
    }
}

fn push_unique<'d>(selected: &mut Vec<&'d EntityAttributeDefinition>, attribute: &'d EntityAttributeDefinition) {
    if !selected.iter().any(|s| s.ordinal() == attribute.ordinal()) {
        selected.push(attribute);
    }
}

impl<E> Default for AttributeSelection<E> {
    fn default() -> Self {
        Self::all()
    }
}

impl<E> Clone for AttributeSelection<E> {
    fn clone(&self) -> Self {
        Self {
            paths:   self.paths.clone(),
            _marker: PhantomData
        }
    }
}

impl<E> fmt::Debug for AttributeSelection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.paths {
            None => f.write_str("AttributeSelection(all)"),
            Some(paths) => f.debug_tuple("AttributeSelection").field(paths).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        location::EntityReference,
        provider::{DerivedDefinitionProvider, EntityDefinitionProvider},
        test_fixtures::{User, Workflow}
    };

    const CREATED_BY: Property<Workflow, Related<User>> = Property::new("created_by");
    const NAME: Property<Workflow, String> = Property::new("name");
    const FIRST_NAME: Property<User, String> = Property::new("first_name");

    fn definition() -> std::sync::Arc<EntityDefinition> {
        DerivedDefinitionProvider::new()
            .resolve(&EntityReference::of::<Workflow>())
            .unwrap()
    }

    #[test]
    fn typed_paths_chain_through_relations() {
        let path = CREATED_BY.then(FIRST_NAME);
        assert_eq!(path.segments(), ["created_by", "first_name"]);
        assert_eq!(AttributePath::from(path).to_string(), "created_by.first_name");
        assert_eq!(
            AttributePath::from_dotted("created_by.first_name").segments(),
            ["created_by", "first_name"]
        );
    }

    #[test]
    fn all_selects_returnable() {
        let definition = definition();
        let selected = AttributeSelection::<Workflow>::all().resolve(&definition).unwrap();
        assert_eq!(selected.len(), definition.returnable_attributes().len());
    }

    #[test]
    fn explicit_selection_keeps_order_and_dedups() {
        let definition = definition();
        let selected = AttributeSelection::new()
            .select(CREATED_BY.then(FIRST_NAME))
            .select(NAME)
            .select(NAME)
            .resolve(&definition)
            .unwrap();
        let names: Vec<_> = selected.iter().map(|a| a.result_name()).collect();
        assert_eq!(names, ["CreatedBy.first_name", "name"]);
    }

    #[test]
    fn relation_selects_everything_beneath() {
        let definition = definition();
        let selected = AttributeSelection::new()
            .select(CREATED_BY)
            .resolve(&definition)
            .unwrap();
        assert!(!selected.is_empty());
        assert!(
            selected
                .iter()
                .all(|a| a.property_path().first() == Some(&"created_by") && !a.is_metadata())
        );
    }

    #[test]
    fn unknown_path_fails() {
        let definition = definition();
        let err = AttributeSelection::<Workflow>::new()
            .select_path(AttributePath::from_dotted("created_by.nope"))
            .resolve(&definition)
            .unwrap_err();
        assert!(err.is_attribute_not_found());
        assert_eq!(err.to_string(), "attribute `created_by.nope` not found");
    }
}
