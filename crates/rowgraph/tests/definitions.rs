// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Definition resolution of derived entities.

mod common;

use common::{Doc, Employee, Field, User, Workflow, provider};
use rowgraph::{
    AttributeFlags, AttributeLocation, EntityReference, ResolverConfig, prelude::*
};

fn resolve<T: Entity>() -> Arc<EntityDefinition> {
    provider().resolve(&EntityReference::of::<T>()).unwrap()
}

fn result_names(definition: &EntityDefinition) -> Vec<String> {
    definition
        .all_attributes()
        .iter()
        .map(|a| a.result_name())
        .collect()
}

#[test]
fn flat_entity_uses_column_overrides() {
    let definition = resolve::<Field>();
    assert_eq!(result_names(&definition), ["Id", "Name", "Description"]);
    assert!(definition.all_attributes().iter().all(|a| a.is_direct()));
    assert_eq!(definition.primary_key_attributes().len(), 1);
    assert_eq!(definition.location().container(), "public");
    assert_eq!(definition.location().name(), "Field");
}

#[test]
fn resolution_is_deterministic() {
    let first = DerivedDefinitionProvider::new()
        .resolve(&EntityReference::of::<Workflow>())
        .unwrap();
    let second = DerivedDefinitionProvider::new()
        .resolve(&EntityReference::of::<Workflow>())
        .unwrap();
    assert_eq!(first.all_attributes(), second.all_attributes());
    assert_eq!(result_names(&first), result_names(&second));
}

#[test]
fn resolve_is_cached_per_provider() {
    let provider = provider();
    let a = provider.resolve(&EntityReference::of::<Workflow>()).unwrap();
    let b = provider.resolve(&EntityReference::of::<Workflow>()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn filtered_views_hold_their_invariants() {
    let definition = resolve::<Workflow>();

    assert!(
        definition
            .returnable_attributes()
            .iter()
            .all(|a| !a.is_metadata())
    );
    assert!(definition.direct_attributes().iter().all(|a| a.is_direct()));
    assert!(
        definition
            .primary_key_attributes()
            .iter()
            .all(|a| a.is_direct() && a.is_primary_key())
    );
    assert!(
        definition
            .updateable_attributes()
            .iter()
            .all(|a| a.is_direct() && !a.is_identity_column())
    );
    assert!(definition.relation_attributes().iter().all(|a| a.is_relation()));
    assert_eq!(definition.auto_number_primary_key().property_name(), "id");
}

#[test]
fn nested_relation_is_flattened_with_related_flags() {
    let definition = resolve::<Workflow>();

    let first_name = definition.find_by_dotted_path("created_by.first_name");
    assert!(!first_name.is_empty());
    assert!(first_name.flags().contains(AttributeFlags::RELATED_ATTRIBUTE));
    assert_eq!(first_name.result_name(), "CreatedBy.first_name");
    assert_eq!(first_name.entity().map(|node| node.container()), Some("auth"));

    let key = definition.find("CreatedBy", "id");
    assert!(key.is_primary_key());
    assert!(!key.is_direct());
}

#[test]
fn explicit_related_column_keeps_declaring_name() {
    let definition = resolve::<Workflow>();
    let owner = definition.find_by_path(&["owner_name"]);
    assert!(owner.is_related());
    assert_eq!(owner.physical_name(), "first_name");
    assert_eq!(owner.result_name(), "owner_name");
    assert!(owner.is_referenced_direct());
}

#[test]
fn unknown_names_find_nothing() {
    let definition = resolve::<Workflow>();
    assert!(definition.find_by_path(&["nope"]).is_empty());
    assert!(definition.find_by_dotted_path("created_by.nope").is_empty());
    assert!(definition.find("Nobody", "id").is_empty());
    assert!(definition.find_by_result_name("missing").is_empty());
    assert!(
        definition
            .find_by_location(&AttributeLocation::of::<Field>("id"))
            .is_empty()
    );
}

#[test]
fn unaliased_location_matches_any_node_of_type() {
    let definition = resolve::<Workflow>();
    let found = definition.find_by_location(&AttributeLocation::of::<User>("first_name"));
    assert_eq!(found.result_name(), "CreatedBy.first_name");
}

#[test]
fn self_reference_terminates() {
    let definition = resolve::<Employee>();
    assert!(!definition.find_by_dotted_path("manager.name").is_empty());
    assert!(definition.find_by_dotted_path("manager.manager.name").is_empty());
}

#[test]
fn nested_relations_are_aliased_under_their_owner() {
    let definition = resolve::<Doc>();
    assert_eq!(
        definition.find_by_dotted_path("created_by.dept.name").result_name(),
        "CreatedBy.Dept.name"
    );
    assert_eq!(
        definition.find_by_dotted_path("modified_by.dept.name").result_name(),
        "ModifiedBy.Dept.name"
    );
    assert_eq!(
        definition.find_by_dotted_path("modified_by.first_name").result_name(),
        "ModifiedBy.first_name"
    );
}

#[test]
fn default_container_comes_from_config() {
    let provider =
        DerivedDefinitionProvider::with_config(ResolverConfig::default().with_default_container("core"));
    let definition = provider.resolve(&EntityReference::of::<Workflow>()).unwrap();
    assert_eq!(definition.location().container(), "core");

    let user = provider.resolve(&EntityReference::of::<User>()).unwrap();
    assert_eq!(user.location().container(), "auth");
}

#[test]
fn instances_read_back_values() {
    let definition = resolve::<Field>();
    let field = Field {
        id:          4,
        name:        "MahField".into(),
        description: None
    };
    let instances = definition.instances(&field).unwrap();
    let values: Vec<&Value> = instances.iter().map(|i| i.value()).collect();
    assert_eq!(values, [&Value::I32(4), &Value::from("MahField")]);
}
