// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Hand-written entity metadata for unit tests.
//!
//! Mirrors what `#[derive(Entity)]` emits so the core crate can test itself
//! without the proc-macro.

use std::{
    any::{Any, TypeId},
    sync::Arc
};

use crate::{
    accessor::{Accessor, SharedEntity, downcast, downcast_mut, downcast_shared},
    attribute::AttributeFlags,
    info::{Entity, EntityInfo, PropertyInfo, PropertyKind},
    value::{FromValue, IntoValue, ValueKind}
};

macro_rules! scalar {
    ($owner:ty, $field:ident) => {
        Some(Accessor::Scalar {
            get: |entity| Ok(downcast::<$owner>(entity, stringify!($owner), stringify!($field))?.$field.to_value()),
            set: |entity, value| {
                downcast_mut::<$owner>(entity, stringify!($owner), stringify!($field))?.$field =
                    FromValue::from_value(value)?;
                Ok(())
            }
        })
    };
}

macro_rules! relation {
    ($owner:ty, $field:ident, $target:ty) => {
        Some(Accessor::Relation {
            get: |entity| {
                let owner = downcast::<$owner>(entity, stringify!($owner), stringify!($field))?;
                Ok(owner.$field.clone().map(|related| related as SharedEntity))
            },
            set: |entity, related| {
                let owner = downcast_mut::<$owner>(entity, stringify!($owner), stringify!($field))?;
                owner.$field = related
                    .map(|shared| downcast_shared::<$target>(shared, stringify!($target), stringify!($field)))
                    .transpose()?;
                Ok(())
            }
        })
    };
}

macro_rules! entity {
    ($ty:ident, $info:ident, $container:expr, $properties:ident) => {
        static $info: EntityInfo = EntityInfo {
            type_name:  stringify!($ty),
            type_id:    TypeId::of::<$ty>,
            container:  $container,
            name:       None,
            properties: &$properties,
            construct:  || Box::new(<$ty>::default()) as Box<dyn Any + Send + Sync>
        };

        impl Entity for $ty {
            fn entity_info() -> &'static EntityInfo {
                &$info
            }
        }
    };
}

const fn column(
    name: &'static str,
    column: Option<&'static str>,
    flags: AttributeFlags,
    value_kind: ValueKind,
    accessor: Option<Accessor>
) -> PropertyInfo {
    PropertyInfo {
        name,
        column,
        alias: None,
        flags,
        kind: PropertyKind::Scalar,
        value_kind,
        accessor
    }
}

const fn nested(
    name: &'static str,
    entity: fn() -> &'static EntityInfo,
    alias: &'static str,
    accessor: Option<Accessor>
) -> PropertyInfo {
    PropertyInfo {
        name,
        column: None,
        alias: None,
        flags: AttributeFlags::NONE,
        kind: PropertyKind::Relation {
            entity,
            alias: Some(alias)
        },
        value_kind: ValueKind::Null,
        accessor
    }
}

/// Flat entity with column overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    pub id:          i32,
    pub name:        String,
    pub description: Option<String>
}

static FIELD_PROPERTIES: [PropertyInfo; 3] = [
    column(
        "id",
        Some("Id"),
        AttributeFlags::PRIMARY_KEY,
        ValueKind::I32,
        scalar!(Field, id)
    ),
    column("name", Some("Name"), AttributeFlags::NONE, ValueKind::Text, scalar!(Field, name)),
    column(
        "description",
        Some("Description"),
        AttributeFlags::NONE,
        ValueKind::Text,
        scalar!(Field, description)
    )
];
entity!(Field, FIELD_INFO, None, FIELD_PROPERTIES);

/// Related entity living in another container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id:         i32,
    pub first_name: String
}

static USER_PROPERTIES: [PropertyInfo; 2] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I32, scalar!(User, id)),
    column(
        "first_name",
        None,
        AttributeFlags::NONE,
        ValueKind::Text,
        scalar!(User, first_name)
    )
];
entity!(User, USER_INFO, Some("auth"), USER_PROPERTIES);

/// Root with an auto-number key, a flat related column and a nested relation.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    pub id:         i64,
    pub name:       String,
    pub owner_name: Option<String>,
    pub created_by: Option<Arc<User>>
}

static WORKFLOW_PROPERTIES: [PropertyInfo; 4] = [
    column(
        "id",
        None,
        AttributeFlags::PRIMARY_KEY.union(AttributeFlags::IDENTITY_COLUMN),
        <i64 as IntoValue>::KIND,
        scalar!(Workflow, id)
    ),
    column("name", None, AttributeFlags::NONE, ValueKind::Text, scalar!(Workflow, name)),
    PropertyInfo {
        kind: PropertyKind::Related {
            entity: <User as Entity>::entity_info,
            alias:  Some("Owner")
        },
        ..column(
            "owner_name",
            Some("first_name"),
            AttributeFlags::NONE,
            ValueKind::Text,
            scalar!(Workflow, owner_name)
        )
    },
    nested(
        "created_by",
        <User as Entity>::entity_info,
        "CreatedBy",
        relation!(Workflow, created_by, User)
    )
];
entity!(Workflow, WORKFLOW_INFO, None, WORKFLOW_PROPERTIES);

/// Self-referencing entity.
#[derive(Debug, Clone, Default)]
pub struct Employee {
    pub id:         i32,
    pub name:       String,
    pub manager:    Option<Arc<Employee>>,
    pub department: Option<Arc<Department>>
}

static EMPLOYEE_PROPERTIES: [PropertyInfo; 4] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I32, scalar!(Employee, id)),
    column("name", None, AttributeFlags::NONE, ValueKind::Text, scalar!(Employee, name)),
    nested(
        "manager",
        <Employee as Entity>::entity_info,
        "Manager",
        relation!(Employee, manager, Employee)
    ),
    nested(
        "department",
        <Department as Entity>::entity_info,
        "Department",
        relation!(Employee, department, Department)
    )
];
entity!(Employee, EMPLOYEE_INFO, None, EMPLOYEE_PROPERTIES);

/// Entity in a mutual reference with [`Employee`].
#[derive(Debug, Clone, Default)]
pub struct Department {
    pub id:   i32,
    pub name: String,
    pub head: Option<Arc<Employee>>
}

static DEPARTMENT_PROPERTIES: [PropertyInfo; 3] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I32, scalar!(Department, id)),
    column("name", None, AttributeFlags::NONE, ValueKind::Text, scalar!(Department, name)),
    nested(
        "head",
        <Employee as Entity>::entity_info,
        "Head",
        relation!(Department, head, Employee)
    )
];
entity!(Department, DEPARTMENT_INFO, None, DEPARTMENT_PROPERTIES);

/// Metadata without an accessor.
#[derive(Debug, Clone, Default)]
pub struct Unreadable {
    pub secret: String
}

static UNREADABLE_PROPERTIES: [PropertyInfo; 1] =
    [column("secret", None, AttributeFlags::NONE, ValueKind::Text, None)];
entity!(Unreadable, UNREADABLE_INFO, None, UNREADABLE_PROPERTIES);

/// Metadata with an empty column override.
#[derive(Debug, Clone, Default)]
pub struct Broken {
    pub value: i32
}

static BROKEN_PROPERTIES: [PropertyInfo; 1] = [column(
    "value",
    Some(""),
    AttributeFlags::NONE,
    ValueKind::I32,
    scalar!(Broken, value)
)];
entity!(Broken, BROKEN_INFO, None, BROKEN_PROPERTIES);

/// Two database-generated columns on one root.
#[derive(Debug, Clone, Default)]
pub struct TwoCounters {
    pub id:       i64,
    pub sequence: i64
}

static TWO_COUNTERS_PROPERTIES: [PropertyInfo; 2] = [
    column(
        "id",
        None,
        AttributeFlags::PRIMARY_KEY.union(AttributeFlags::IDENTITY_COLUMN),
        ValueKind::I64,
        scalar!(TwoCounters, id)
    ),
    column(
        "sequence",
        None,
        AttributeFlags::IDENTITY_COLUMN,
        ValueKind::I64,
        scalar!(TwoCounters, sequence)
    )
];
entity!(TwoCounters, TWO_COUNTERS_INFO, None, TWO_COUNTERS_PROPERTIES);

/// Department reached through more than one path.
#[derive(Debug, Clone, Default)]
pub struct Dept {
    pub id:   i32,
    pub name: String
}

static DEPT_PROPERTIES: [PropertyInfo; 2] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I32, scalar!(Dept, id)),
    column("name", None, AttributeFlags::NONE, ValueKind::Text, scalar!(Dept, name))
];
entity!(Dept, DEPT_INFO, None, DEPT_PROPERTIES);

/// Person with a nested relation of its own.
#[derive(Debug, Clone, Default)]
pub struct Person {
    pub id:         i32,
    pub first_name: String,
    pub dept:       Option<Arc<Dept>>
}

static PERSON_PROPERTIES: [PropertyInfo; 3] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I32, scalar!(Person, id)),
    column(
        "first_name",
        None,
        AttributeFlags::NONE,
        ValueKind::Text,
        scalar!(Person, first_name)
    ),
    nested("dept", <Dept as Entity>::entity_info, "Dept", relation!(Person, dept, Dept))
];
entity!(Person, PERSON_INFO, None, PERSON_PROPERTIES);

/// Two relations to the same entity type.
#[derive(Debug, Clone, Default)]
pub struct Doc {
    pub id:          i64,
    pub created_by:  Option<Arc<Person>>,
    pub modified_by: Option<Arc<Person>>
}

static DOC_PROPERTIES: [PropertyInfo; 3] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I64, scalar!(Doc, id)),
    nested(
        "created_by",
        <Person as Entity>::entity_info,
        "CreatedBy",
        relation!(Doc, created_by, Person)
    ),
    nested(
        "modified_by",
        <Person as Entity>::entity_info,
        "ModifiedBy",
        relation!(Doc, modified_by, Person)
    )
];
entity!(Doc, DOC_INFO, None, DOC_PROPERTIES);

/// Two relations declaring the same alias.
#[derive(Debug, Clone, Default)]
pub struct Clash {
    pub id:     i32,
    pub author: Option<Arc<User>>,
    pub editor: Option<Arc<User>>
}

static CLASH_PROPERTIES: [PropertyInfo; 3] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I32, scalar!(Clash, id)),
    nested("author", <User as Entity>::entity_info, "Author", relation!(Clash, author, User)),
    nested("editor", <User as Entity>::entity_info, "Author", relation!(Clash, editor, User))
];
entity!(Clash, CLASH_INFO, None, CLASH_PROPERTIES);

/// Entity without a key.
#[derive(Debug, Clone, Default)]
pub struct Tag {
    pub label: String,
    pub color: Option<String>
}

static TAG_PROPERTIES: [PropertyInfo; 2] = [
    column("label", None, AttributeFlags::NONE, ValueKind::Text, scalar!(Tag, label)),
    column("color", None, AttributeFlags::NONE, ValueKind::Text, scalar!(Tag, color))
];
entity!(Tag, TAG_INFO, None, TAG_PROPERTIES);

/// Root relating to a keyless entity.
#[derive(Debug, Clone, Default)]
pub struct Note {
    pub id:  i32,
    pub tag: Option<Arc<Tag>>
}

static NOTE_PROPERTIES: [PropertyInfo; 2] = [
    column("id", None, AttributeFlags::PRIMARY_KEY, ValueKind::I32, scalar!(Note, id)),
    nested("tag", <Tag as Entity>::entity_info, "Tag", relation!(Note, tag, Tag))
];
entity!(Note, NOTE_INFO, None, NOTE_PROPERTIES);
