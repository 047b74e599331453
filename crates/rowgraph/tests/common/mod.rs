// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entities shared by the integration tests.

#![allow(dead_code)]

use rowgraph::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Entity)]
pub struct Field {
    #[id]
    #[column(name = "Id")]
    pub id: i32,

    #[column(name = "Name")]
    pub name: String,

    #[column(name = "Description")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[entity(schema = "auth")]
pub struct User {
    #[id]
    pub id: i32,

    pub first_name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Workflow {
    #[id]
    #[auto]
    pub id: i64,

    pub name: String,

    #[related(User, alias = "Owner", column = "first_name")]
    pub owner_name: Option<String>,

    #[relation(alias = "CreatedBy")]
    pub created_by: Option<Arc<User>>,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Employee {
    #[id]
    pub id: i32,

    pub name: String,

    #[relation]
    pub manager: Option<Arc<Employee>>,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Dept {
    #[id]
    pub id: i32,

    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Person {
    #[id]
    pub id: i32,

    pub first_name: String,

    #[relation]
    pub dept: Option<Arc<Dept>>,
}

/// Two relations to [`Person`], each carrying its own `Dept`.
#[derive(Debug, Clone, Default, Entity)]
pub struct Doc {
    #[id]
    pub id: i64,

    #[relation]
    pub created_by: Option<Arc<Person>>,

    #[relation]
    pub modified_by: Option<Arc<Person>>,
}

/// No key column.
#[derive(Debug, Clone, Default, Entity)]
pub struct Tag {
    pub label: String,

    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Note {
    #[id]
    pub id: i32,

    #[relation]
    pub tag: Option<Arc<Tag>>,
}

pub fn provider() -> Arc<DerivedDefinitionProvider> {
    Arc::new(DerivedDefinitionProvider::new())
}

pub fn materializer() -> Materializer {
    Materializer::new(provider())
}

/// Reader over `id, name, owner_name, CreatedBy.id, CreatedBy.first_name`.
pub fn workflow_reader(rows: &[(i64, &str, Option<i32>, Option<&str>)]) -> MemoryRowReader {
    let mut reader = MemoryRowReader::new([
        "id",
        "name",
        "owner_name",
        "CreatedBy.id",
        "CreatedBy.first_name"
    ]);
    for &(id, name, user_id, first_name) in rows {
        reader.push_row(vec![
            Value::I64(id),
            Value::from(name),
            Value::from(first_name),
            Value::from(user_id),
            Value::from(first_name)
        ]);
    }
    reader
}
