// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Nested relations, flat related columns and self references.

use std::sync::Arc;

use rowgraph::{Entity, prelude::*};

#[derive(Debug, Default, Entity)]
#[entity(schema = "auth")]
pub struct User {
    #[id]
    pub id: i32,
    pub first_name: String,
}

#[derive(Debug, Default, Entity)]
pub struct Workflow {
    #[id]
    #[auto]
    pub id: i64,

    pub name: String,

    #[related(User, alias = "Owner", column = "first_name")]
    pub owner_name: Option<String>,

    #[relation(alias = "CreatedBy")]
    pub created_by: Option<Arc<User>>,

    #[relation]
    pub updated_by: Option<std::sync::Arc<User>>,
}

#[derive(Debug, Default, Entity)]
pub struct Employee {
    #[id]
    pub id: i32,

    #[relation]
    pub manager: Option<Arc<Employee>>,
}

fn main() {
    let path: AttributePath = Workflow::CREATED_BY.then(User::FIRST_NAME).into();
    assert_eq!(path.to_string(), "created_by.first_name");

    let _: Property<Workflow, Related<User>> = Workflow::UPDATED_BY;
    let _: Property<Employee, Related<Employee>> = Employee::MANAGER;

    let info = Workflow::entity_info();
    assert!(info.property("created_by").is_some_and(|p| p.kind.is_relation()));
}
