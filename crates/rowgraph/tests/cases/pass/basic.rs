// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Flat entity with column overrides.

use rowgraph::prelude::*;

#[derive(Debug, Default, Entity)]
#[entity(table = "fields")]
pub struct Field {
    #[id]
    #[column(name = "Id")]
    pub id: i32,

    #[column(name = "Name", unique)]
    pub name: String,

    #[column(name = "Description")]
    pub description: Option<String>,
}

fn main() {
    let info = <Field as rowgraph::Entity>::entity_info();
    assert_eq!(info.type_name, "Field");
    assert_eq!(info.name, Some("fields"));
    assert_eq!(info.properties.len(), 3);

    let _: Property<Field, i32> = Field::ID;
    let _: Property<Field, String> = Field::NAME;
    let _: Property<Field, Option<String>> = Field::DESCRIPTION;
}
