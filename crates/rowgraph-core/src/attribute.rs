// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute definitions.
//!
//! An [`EntityAttributeDefinition`] is the resolved metadata of one mapped
//! property as seen from a query root: where it lives in the entity graph,
//! what column it maps to, which key roles it plays and how to read and
//! write it.
//!
//! # Path Model
//!
//! ```text
//! Workflow ──CreatedBy──► User ──(virtual) Department
//!    ▲                     ▲            ▲
//!    │                     │            └─ reference_node(): logical owner of the column
//!    │                     └─ entity(): object that holds the property
//!    └─ path[0]: query root
//! ```
//!
//! `entity_path()` is the path truncated after `entity()`; it identifies the
//! object a materializer must create to hold the value.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{BitOr, BitOrAssign},
    sync::Arc
};

use once_cell::sync::Lazy;

use crate::{
    accessor::Accessor,
    error::AccessError,
    location::EntityLocation,
    value::{Value, ValueKind}
};

/// Role flags of an attribute.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeFlags(u16);

impl AttributeFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Owned by the query root.
    pub const DIRECT_ATTRIBUTE: Self = Self(1);
    /// Part of the primary key.
    pub const PRIMARY_KEY: Self = Self(1 << 1);
    /// Generated by the database (auto-number).
    pub const IDENTITY_COLUMN: Self = Self(1 << 2);
    /// Part of a unique key.
    pub const UNIQUE_KEY: Self = Self(1 << 3);
    /// Owned by a related entity.
    pub const RELATED_ATTRIBUTE: Self = Self(1 << 4);
    /// Mapping metadata only, never returned.
    pub const MAPPED_ATTRIBUTE: Self = Self(1 << 5);
    /// Navigation to a related entity.
    pub const RELATION: Self = Self(1 << 6);
    /// Related column flattened onto the declaring entity.
    pub const EXPLICIT_RELATED_ATTRIBUTE: Self = Self(1 << 7);

    /// Direct primary key column.
    pub const DIRECT_PRIMARY_KEY: Self = Self::DIRECT_ATTRIBUTE.union(Self::PRIMARY_KEY);
    /// Direct auto-number primary key column.
    pub const DIRECT_AUTO_NUMBER_KEY: Self = Self::DIRECT_PRIMARY_KEY.union(Self::IDENTITY_COLUMN);
    /// Primary key column of a related entity.
    pub const RELATED_PRIMARY_KEY: Self = Self::RELATED_ATTRIBUTE.union(Self::PRIMARY_KEY);

    const NAMES: [(Self, &'static str); 8] = [
        (Self::DIRECT_ATTRIBUTE, "DIRECT_ATTRIBUTE"),
        (Self::PRIMARY_KEY, "PRIMARY_KEY"),
        (Self::IDENTITY_COLUMN, "IDENTITY_COLUMN"),
        (Self::UNIQUE_KEY, "UNIQUE_KEY"),
        (Self::RELATED_ATTRIBUTE, "RELATED_ATTRIBUTE"),
        (Self::MAPPED_ATTRIBUTE, "MAPPED_ATTRIBUTE"),
        (Self::RELATION, "RELATION"),
        (Self::EXPLICIT_RELATED_ATTRIBUTE, "EXPLICIT_RELATED_ATTRIBUTE")
    ];

    /// Raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Combine two flag sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove `other` from this set.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Check if every flag of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if any flag of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Check if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AttributeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for AttributeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for AttributeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Resolved metadata of one mapped property.
///
/// Cheap to clone: paths are shared.
#[derive(Clone)]
pub struct EntityAttributeDefinition {
    physical_name: &'static str,
    alias:         Option<&'static str>,
    ordinal:       usize,
    property_name: &'static str,
    property_path: Arc<[&'static str]>,
    flags:         AttributeFlags,
    path:          Arc<[EntityLocation]>,
    related:       Option<EntityLocation>,
    links:         Arc<[Accessor]>,
    accessor:      Option<Accessor>,
    value_kind:    ValueKind
}

static EMPTY: Lazy<EntityAttributeDefinition> = Lazy::new(|| EntityAttributeDefinition {
    physical_name: "",
    alias:         None,
    ordinal:       0,
    property_name: "",
    property_path: Arc::from(Vec::new()),
    flags:         AttributeFlags::NONE,
    path:          Arc::from(Vec::new()),
    related:       None,
    links:         Arc::from(Vec::new()),
    accessor:      None,
    value_kind:    ValueKind::Null
});

impl EntityAttributeDefinition {
    /// Start a definition for `property_name` stored in `physical_name`.
    ///
    /// `path` runs from the query root to the node owning the column.
    pub fn new(
        property_name: &'static str,
        physical_name: &'static str,
        path: Arc<[EntityLocation]>,
        accessor: Accessor
    ) -> Self {
        Self {
            physical_name,
            alias: None,
            ordinal: 0,
            property_name,
            property_path: Arc::from(vec![property_name]),
            flags: AttributeFlags::NONE,
            path,
            related: None,
            links: Arc::from(Vec::new()),
            accessor: Some(accessor),
            value_kind: ValueKind::Null
        }
    }

    /// Process-wide "no attribute" sentinel.
    pub fn empty() -> &'static Self {
        &EMPTY
    }

    /// Set the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: Option<&'static str>) -> Self {
        self.alias = alias;
        self
    }

    /// Set the ordinal.
    #[must_use]
    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Set the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: AttributeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the declared value kind.
    #[must_use]
    pub fn with_value_kind(mut self, kind: ValueKind) -> Self {
        self.value_kind = kind;
        self
    }

    /// Set the relation properties leading from the root to the owner.
    ///
    /// `links` are the relation accessors for those properties, in order.
    #[must_use]
    pub fn with_relation_path(mut self, relations: &[&'static str], links: Arc<[Accessor]>) -> Self {
        let mut path = relations.to_vec();
        path.push(self.property_name);
        self.property_path = Arc::from(path);
        self.links = links;
        self
    }

    /// Set the node a relation attribute introduces.
    #[must_use]
    pub fn with_related(mut self, related: EntityLocation) -> Self {
        self.related = Some(related);
        self
    }

    /// Check if this is the [`empty`](Self::empty) sentinel.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.physical_name.is_empty()
    }

    /// Physical column name.
    pub const fn physical_name(&self) -> &'static str {
        self.physical_name
    }

    /// Column alias, if any.
    pub const fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    /// Alias if set, otherwise the physical name.
    pub fn reference_name(&self) -> &'static str {
        self.alias.unwrap_or(self.physical_name)
    }

    /// Position in the owning definition.
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Rust field name.
    pub const fn property_name(&self) -> &'static str {
        self.property_name
    }

    /// Relation property names from the root followed by the property name.
    pub fn property_path(&self) -> &[&'static str] {
        &self.property_path
    }

    /// Dotted form of [`property_path`](Self::property_path).
    pub fn dotted_path(&self) -> String {
        self.property_path.join(".")
    }

    /// Role flags.
    pub const fn flags(&self) -> AttributeFlags {
        self.flags
    }

    /// Full path from the query root to the reference node.
    pub fn path(&self) -> &[EntityLocation] {
        &self.path
    }

    /// Node introduced by a relation attribute.
    pub const fn related(&self) -> Option<&EntityLocation> {
        self.related.as_ref()
    }

    /// Get/set binding. `None` only for the empty sentinel.
    pub const fn accessor(&self) -> Option<Accessor> {
        self.accessor
    }

    /// Declared scalar kind; [`ValueKind::Null`] for relations.
    pub const fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// Object that holds the property: the last non-virtual node.
    pub fn entity(&self) -> Option<&EntityLocation> {
        self.path.iter().rev().find(|node| !node.is_virtual())
    }

    /// Logical owner of the column: the last node, virtual or not.
    pub fn reference_node(&self) -> Option<&EntityLocation> {
        self.path.last()
    }

    /// Path truncated after [`entity`](Self::entity).
    pub fn entity_path(&self) -> &[EntityLocation] {
        let end = self
            .path
            .iter()
            .rposition(|node| !node.is_virtual())
            .map_or(0, |i| i + 1);
        &self.path[..end]
    }

    /// Column name a materializer expects in the result row.
    ///
    /// Root-owned attributes use the bare reference name; nested ones are
    /// prefixed with the owning node's alias (or name). Deeper aliases carry
    /// their owner's, so `created_by.dept.name` reads `CreatedBy.Dept.name`.
    pub fn result_name(&self) -> String {
        match self.entity() {
            Some(owner) if !self.is_referenced_direct() => {
                format!("{}.{}", owner.reference_name(), self.reference_name())
            }
            _ => self.reference_name().to_owned()
        }
    }

    /// Owned by the query root.
    pub const fn is_direct(&self) -> bool {
        self.flags.contains(AttributeFlags::DIRECT_ATTRIBUTE)
    }

    /// Part of the primary key.
    pub const fn is_primary_key(&self) -> bool {
        self.flags.contains(AttributeFlags::PRIMARY_KEY)
    }

    /// Generated by the database.
    pub const fn is_identity_column(&self) -> bool {
        self.flags.contains(AttributeFlags::IDENTITY_COLUMN)
    }

    /// Part of a unique key.
    pub const fn is_unique_key(&self) -> bool {
        self.flags.contains(AttributeFlags::UNIQUE_KEY)
    }

    /// Owned by a related entity.
    pub const fn is_related(&self) -> bool {
        self.flags.contains(AttributeFlags::RELATED_ATTRIBUTE)
    }

    /// Navigation to a related entity.
    pub const fn is_relation(&self) -> bool {
        self.flags.contains(AttributeFlags::RELATION)
    }

    /// Relation or mapped attribute; never returned.
    pub const fn is_metadata(&self) -> bool {
        self.flags
            .intersects(AttributeFlags::RELATION.union(AttributeFlags::MAPPED_ATTRIBUTE))
    }

    /// Held by the root object itself.
    pub fn is_referenced_direct(&self) -> bool {
        self.entity_path().len() == 1
    }

    /// Read the property from a root object.
    ///
    /// Walks relation getters from the root to the owning object. A missing
    /// relation yields [`Value::Null`]; relation attributes and the empty
    /// sentinel read as `NULL` too.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if `root` is not the query root type.
    pub fn read_value(&self, root: &dyn std::any::Any) -> Result<Value, AccessError> {
        let Some(Accessor::Scalar {
            get, ..
        }) = self.accessor
        else {
            return Ok(Value::Null);
        };

        let mut owner: Option<crate::accessor::SharedEntity> = None;
        for link in self.links.iter() {
            let Accessor::Relation {
                get: follow, ..
            } = link
            else {
                continue;
            };
            let object: &dyn std::any::Any = match &owner {
                Some(shared) => shared.as_ref(),
                None => root
            };
            match follow(object)? {
                Some(next) => owner = Some(next),
                None => return Ok(Value::Null)
            }
        }

        match &owner {
            Some(shared) => get(shared.as_ref()),
            None => get(root)
        }
    }

    fn sort_key(
        &self
    ) -> (
        Option<&EntityLocation>,
        Option<&EntityLocation>,
        usize,
        &'static str,
        &'static str,
        Option<&'static str>,
        AttributeFlags
    ) {
        (
            self.entity(),
            self.reference_node(),
            self.ordinal,
            self.property_name,
            self.physical_name,
            self.alias,
            self.flags
        )
    }
}

impl PartialEq for EntityAttributeDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for EntityAttributeDefinition {}

impl Hash for EntityAttributeDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for EntityAttributeDefinition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityAttributeDefinition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Debug for EntityAttributeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityAttributeDefinition")
            .field("property_path", &self.dotted_path())
            .field("physical_name", &self.physical_name)
            .field("alias", &self.alias)
            .field("ordinal", &self.ordinal)
            .field("flags", &self.flags)
            .field("entity", &self.entity().map(ToString::to_string))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for EntityAttributeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reference_node() {
            Some(node) => write!(f, "{}.{}", node, self.reference_name()),
            None => f.write_str("<empty>")
        }
    }
}

/// An attribute definition paired with the value read from an object.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAttributeInstance {
    definition: EntityAttributeDefinition,
    value:      Value
}

impl EntityAttributeInstance {
    /// Pair a definition with a value.
    pub const fn new(definition: EntityAttributeDefinition, value: Value) -> Self {
        Self {
            definition,
            value
        }
    }

    /// Attribute definition.
    pub const fn definition(&self) -> &EntityAttributeDefinition {
        &self.definition
    }

    /// Value read from the object.
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Split into definition and value.
    pub fn into_parts(self) -> (EntityAttributeDefinition, Value) {
        (self.definition, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        info::Entity,
        location::EntityType,
        test_fixtures::{Field, User, Workflow}
    };

    fn field_name() -> EntityAttributeDefinition {
        let root = EntityLocation::new(EntityType::of::<Field>(), "public", "Field");
        let accessor = Field::entity_info().property("name").and_then(|p| p.accessor).unwrap();
        EntityAttributeDefinition::new("name", "Name", Arc::from(vec![root]), accessor)
            .with_flags(AttributeFlags::DIRECT_ATTRIBUTE)
            .with_value_kind(ValueKind::Text)
    }

    #[test]
    fn flags_compose() {
        let flags = AttributeFlags::DIRECT_AUTO_NUMBER_KEY;
        assert!(flags.contains(AttributeFlags::PRIMARY_KEY));
        assert!(flags.contains(AttributeFlags::DIRECT_PRIMARY_KEY));
        assert!(!flags.contains(AttributeFlags::RELATED_ATTRIBUTE));
        assert!(flags.intersects(AttributeFlags::IDENTITY_COLUMN | AttributeFlags::RELATION));
        assert_eq!(
            flags.difference(AttributeFlags::DIRECT_ATTRIBUTE),
            AttributeFlags::PRIMARY_KEY | AttributeFlags::IDENTITY_COLUMN
        );
        assert_eq!(
            format!("{:?}", AttributeFlags::RELATED_PRIMARY_KEY),
            "PRIMARY_KEY | RELATED_ATTRIBUTE"
        );
        assert_eq!(format!("{:?}", AttributeFlags::NONE), "NONE");
    }

    #[test]
    fn empty_sentinel_is_shared() {
        let a = EntityAttributeDefinition::empty();
        let b = EntityAttributeDefinition::empty();
        assert!(std::ptr::eq(a, b));
        assert!(a.is_empty());
        assert!(a.entity().is_none());
        assert!(a.entity_path().is_empty());
        assert_eq!(a.read_value(&Field::default()), Ok(Value::Null));
        assert!(!field_name().is_empty());
    }

    #[test]
    fn direct_attribute_names() {
        let def = field_name();
        assert_eq!(def.reference_name(), "Name");
        assert_eq!(def.result_name(), "Name");
        assert!(def.is_referenced_direct());
        assert!(def.is_direct());
        assert!(!def.is_metadata());

        let aliased = def.with_alias(Some("FieldName"));
        assert_eq!(aliased.reference_name(), "FieldName");
        assert_eq!(aliased.physical_name(), "Name");
    }

    #[test]
    fn virtual_node_splits_entity_and_reference_node() {
        let root = EntityLocation::new(EntityType::of::<Workflow>(), "public", "Workflow");
        let user = EntityLocation::new(EntityType::of::<User>(), "public", "User")
            .with_alias("Owner")
            .into_virtual();
        let accessor = Workflow::entity_info()
            .property("owner_name")
            .and_then(|p| p.accessor)
            .unwrap();
        let def = EntityAttributeDefinition::new(
            "owner_name",
            "first_name",
            Arc::from(vec![root.clone(), user.clone()]),
            accessor
        )
        .with_alias(Some("owner_name"));

        assert_eq!(def.entity(), Some(&root));
        assert_eq!(def.reference_node(), Some(&user));
        assert_eq!(def.entity_path(), std::slice::from_ref(&root));
        assert!(def.is_referenced_direct());
        assert_eq!(def.result_name(), "owner_name");
    }

    #[test]
    fn structural_equality_ignores_accessor() {
        assert_eq!(field_name(), field_name());
        assert_ne!(field_name(), field_name().with_ordinal(1));
        assert!(field_name() < field_name().with_ordinal(1));
    }

    #[test]
    fn read_value_from_root() {
        let field = Field {
            name: "MahField".into(),
            ..Field::default()
        };
        assert_eq!(field_name().read_value(&field), Ok(Value::Text("MahField".into())));
    }
}
