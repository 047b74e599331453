// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row materialization.
//!
//! Turns the current row of a [`RowReader`] into an object graph.
//!
//! # Per-Row Algorithm
//!
//! ```text
//! columns + target + selection ──► PlanCache ──► MappingPlan
//!                                                   │
//! row values ──► null suppression per node ◄────────┘
//!            ──► setters on fresh node objects
//!            ──► finalize deepest-first:
//!                  keyed node? IdentityCache hit reuses the cached Arc
//!                  attach to parent through the relation setter
//!            ──► root downcast to T
//! ```
//!
//! # Null Suppression
//!
//! | Policy | A related node is skipped when |
//! |--------|-------------------------------|
//! | [`NullSuppression::KeyOrAllAttributes`] | its selected key columns are all `NULL`; lacking keys, all its selected columns |
//! | [`NullSuppression::AllAttributes`] | all its selected columns are `NULL` |
//! | [`NullSuppression::Never`] | never |
//!
//! A skipped node leaves its parent reference `None` and skips its
//! descendants. A node that owns no selected column only sits on the way to
//! deeper nodes; under the first two policies it is created only when at
//! least one of its descendants is. The root is always created.
//!
//! # Identity Keys
//!
//! Integer key components are widened to `i64` before the identity lookup,
//! so the same row key read as `INT` by one join and `BIGINT` by another
//! still resolves to one object.

mod dynamic;
mod identity;
mod plan;
mod rows;

use std::{any::Any, sync::Arc};

pub use dynamic::{DynamicField, DynamicRecord};
pub use identity::IdentityCache;
pub use plan::{Binding, MappingPlan, PlanCache, PlanKey, PlanMode, PlanNode};
pub use rows::{DynamicRows, Rows};
use tracing::error;

use crate::{
    accessor::SharedEntity,
    attribute::EntityAttributeDefinition,
    config::{MaterializerConfig, NullSuppression},
    error::{AccessError, MaterializeError},
    info::Entity,
    location::EntityReference,
    provider::EntityDefinitionProvider,
    reader::RowReader,
    selection::AttributeSelection,
    value::Value
};

/// Requested shape of a row.
#[derive(Debug, Clone)]
pub enum RowShape<E> {
    /// Populate an `E` with the selected attributes.
    Typed(AttributeSelection<E>),
    /// Build a [`DynamicRecord`] with the selected attributes.
    Dynamic(AttributeSelection<E>)
}

/// A materialized row.
#[derive(Debug)]
pub enum MaterializedRow<E> {
    /// Populated entity.
    Typed(E),
    /// Sparse record.
    Dynamic(DynamicRecord)
}

impl<E> MaterializedRow<E> {
    /// The entity, if typed.
    pub fn into_typed(self) -> Option<E> {
        match self {
            Self::Typed(entity) => Some(entity),
            Self::Dynamic(_) => None
        }
    }

    /// The record, if dynamic.
    pub fn into_dynamic(self) -> Option<DynamicRecord> {
        match self {
            Self::Typed(_) => None,
            Self::Dynamic(record) => Some(record)
        }
    }
}

/// Maps rows to entities.
///
/// Cheap to clone; clones share the provider and the plan cache.
///
/// # Example
///
/// ```rust,ignore
/// let materializer = Materializer::new(Arc::new(DerivedDefinitionProvider::new()));
/// for workflow in materializer.rows::<Workflow, _>(reader) {
///     let workflow = workflow?;
///     println!("{} by {:?}", workflow.name, workflow.created_by);
/// }
/// ```
#[derive(Clone)]
pub struct Materializer {
    provider: Arc<dyn EntityDefinitionProvider>,
    plans:    Arc<PlanCache>,
    config:   MaterializerConfig
}

impl Materializer {
    /// Materializer with default configuration and a private plan cache.
    pub fn new(provider: Arc<dyn EntityDefinitionProvider>) -> Self {
        Self::with_config(provider, MaterializerConfig::default())
    }

    /// Materializer with custom configuration and a private plan cache.
    pub fn with_config(provider: Arc<dyn EntityDefinitionProvider>, config: MaterializerConfig) -> Self {
        Self {
            provider,
            plans: Arc::new(PlanCache::new()),
            config
        }
    }

    /// Use a shared plan cache.
    #[must_use]
    pub fn with_plan_cache(mut self, plans: Arc<PlanCache>) -> Self {
        self.plans = plans;
        self
    }

    /// Definition provider.
    pub fn provider(&self) -> &Arc<dyn EntityDefinitionProvider> {
        &self.provider
    }

    /// Plan cache.
    pub const fn plan_cache(&self) -> &Arc<PlanCache> {
        &self.plans
    }

    /// Configuration.
    pub const fn config(&self) -> &MaterializerConfig {
        &self.config
    }

    /// Populate a `T` from every returnable attribute of the current row.
    ///
    /// # Errors
    ///
    /// See [`materialize_selection`](Self::materialize_selection).
    pub fn materialize<T, R>(&self, reader: &R, identities: &mut IdentityCache) -> Result<T, MaterializeError>
    where
        T: Entity,
        R: RowReader + ?Sized
    {
        self.materialize_selection(&AttributeSelection::all(), reader, identities)
    }

    /// Populate a `T` from the selected attributes of the current row.
    ///
    /// Unselected properties keep their `Default` value.
    ///
    /// # Errors
    ///
    /// - [`MaterializeError::Definition`] if `T` cannot be resolved
    /// - [`MaterializeError::AttributeNotFound`] for an unknown selection path
    /// - [`MaterializeError::ColumnNotFound`] if a selected column is missing
    /// - [`MaterializeError::Conversion`] / [`MaterializeError::Access`] if a
    ///   value cannot be assigned
    /// - [`MaterializeError::Reader`] if the reader fails
    pub fn materialize_selection<T, R>(
        &self,
        selection: &AttributeSelection<T>,
        reader: &R,
        identities: &mut IdentityCache
    ) -> Result<T, MaterializeError>
    where
        T: Entity,
        R: RowReader + ?Sized
    {
        let plan = self.plan(selection, reader)?;
        let values = read_values(&plan, reader)?;
        let root = self.populate(&plan, values, identities)?;
        root.downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| MaterializeError::UnexpectedEntity(T::entity_info().type_name))
    }

    /// Build a [`DynamicRecord`] from the selected attributes of the current row.
    ///
    /// # Errors
    ///
    /// Same as [`materialize_selection`](Self::materialize_selection), minus
    /// assignment failures.
    pub fn materialize_dynamic<E, R>(
        &self,
        selection: &AttributeSelection<E>,
        reader: &R
    ) -> Result<DynamicRecord, MaterializeError>
    where
        E: Entity,
        R: RowReader + ?Sized
    {
        let plan = self.plan(selection, reader)?;
        let values = read_values(&plan, reader)?;
        let fields = plan
            .bindings()
            .iter()
            .zip(values)
            .map(|(binding, value)| {
                let attribute = binding.attribute();
                let (container, entity) = owner_of(attribute);
                DynamicField::new(
                    attribute.result_name(),
                    attribute.property_path().to_vec(),
                    container,
                    entity,
                    value
                )
            })
            .collect();
        Ok(DynamicRecord::new(fields))
    }

    /// Materialize the current row in the requested shape.
    ///
    /// # Errors
    ///
    /// See [`materialize_selection`](Self::materialize_selection).
    pub fn materialize_row<E, R>(
        &self,
        shape: &RowShape<E>,
        reader: &R,
        identities: &mut IdentityCache
    ) -> Result<MaterializedRow<E>, MaterializeError>
    where
        E: Entity,
        R: RowReader + ?Sized
    {
        match shape {
            RowShape::Typed(selection) => self
                .materialize_selection(selection, reader, identities)
                .map(MaterializedRow::Typed),
            RowShape::Dynamic(selection) => self
                .materialize_dynamic(selection, reader)
                .map(MaterializedRow::Dynamic)
        }
    }

    /// Lazily materialize every remaining row as `T`.
    pub fn rows<T, R>(&self, reader: R) -> Rows<T, R>
    where
        T: Entity,
        R: RowReader
    {
        Rows::new(self.clone(), reader, AttributeSelection::all())
    }

    /// Lazily materialize every remaining row as `T` with a selection.
    pub fn rows_with<T, R>(&self, selection: AttributeSelection<T>, reader: R) -> Rows<T, R>
    where
        T: Entity,
        R: RowReader
    {
        Rows::new(self.clone(), reader, selection)
    }

    /// Lazily materialize every remaining row as a [`DynamicRecord`].
    pub fn dynamic_rows<E, R>(&self, selection: AttributeSelection<E>, reader: R) -> DynamicRows<E, R>
    where
        E: Entity,
        R: RowReader
    {
        DynamicRows::new(self.clone(), reader, selection)
    }

    /// Materialize the next row, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// See [`materialize_selection`](Self::materialize_selection).
    pub fn first<T, R>(&self, mut reader: R) -> Result<Option<T>, MaterializeError>
    where
        T: Entity,
        R: RowReader
    {
        if !reader.read()? {
            return Ok(None);
        }
        let mut identities = IdentityCache::new();
        self.materialize(&reader, &mut identities).map(Some)
    }

    fn plan<E, R>(&self, selection: &AttributeSelection<E>, reader: &R) -> Result<Arc<MappingPlan>, MaterializeError>
    where
        E: Entity,
        R: RowReader + ?Sized
    {
        let target = EntityReference::of::<E>();
        let columns = reader.column_names();
        let selected_paths = (!selection.is_all()).then(|| selection.paths().to_vec());
        let key = PlanKey::new(target.clone(), selected_paths, columns.clone());

        self.plans.get_or_build(key, || {
            let definition = self.provider.resolve(&target)?;
            let selected = selection.resolve(&definition)?;
            MappingPlan::build(Arc::clone(&definition), &selected, &columns)
        })
    }

    fn populate(
        &self,
        plan: &MappingPlan,
        values: Vec<Value>,
        identities: &mut IdentityCache
    ) -> Result<Box<dyn Any + Send + Sync>, MaterializeError> {
        let nodes = plan.nodes();
        let bindings = plan.bindings();

        let suppressed = suppression(self.config.null_suppression, nodes, &values);

        let mut objects: Vec<Option<Box<dyn Any + Send + Sync>>> = nodes
            .iter()
            .zip(&suppressed)
            .map(|(node, &skip)| (!skip).then(|| (node.entity().construct)()))
            .collect();

        for (binding, value) in bindings.iter().zip(values.iter()) {
            let Some(object) = objects[binding.node()].as_mut() else {
                continue;
            };
            (binding.setter())(&mut **object, value.clone())
                .map_err(|source| assignment_error(binding.attribute(), source))?;
        }

        for index in (1..nodes.len()).rev() {
            let node = &nodes[index];
            let Some(object) = objects[index].take() else {
                continue;
            };
            let mut shared: SharedEntity = Arc::from(object);
            if self.config.share_identities && !node.keys().is_empty() {
                let key: Vec<Value> = node
                    .keys()
                    .iter()
                    .map(|&k| identity_component(&values[k]))
                    .collect();
                if !key.iter().any(Value::is_null) {
                    shared = identities.get_or_insert(node.entity().id(), key, shared);
                }
            }

            let (Some(parent), Some(link)) = (node.parent(), node.link()) else {
                continue;
            };
            if let Some(owner) = objects[parent].as_mut() {
                link(&mut **owner, Some(shared)).map_err(|source| {
                    let location = node.location();
                    error!(
                        container = location.map(|l| l.container()),
                        entity = node.entity().type_name,
                        alias = location.and_then(|l| l.alias()),
                        error = %source,
                        "failed to attach related object"
                    );
                    MaterializeError::Access {
                        container: location.map(|l| l.container().to_owned()).unwrap_or_default(),
                        entity: node.entity().type_name,
                        attribute: location.map(|l| l.reference_name().to_owned()).unwrap_or_default(),
                        source
                    }
                })?;
            }
        }

        objects
            .first_mut()
            .and_then(Option::take)
            .ok_or_else(|| MaterializeError::UnexpectedEntity(plan.definition().entity_type().name()))
    }
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("plans", &self.plans)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn read_values<R: RowReader + ?Sized>(plan: &MappingPlan, reader: &R) -> Result<Vec<Value>, MaterializeError> {
    plan.bindings()
        .iter()
        .map(|binding| reader.get_value(binding.ordinal()).map_err(MaterializeError::from))
        .collect()
}

/// Per-node skip flags.
///
/// Nodes with columns decide on their own values, deepest first; a
/// column-less node survives only through a live child. Skips then cascade
/// from parents to children.
fn suppression(policy: NullSuppression, nodes: &[PlanNode], values: &[Value]) -> Vec<bool> {
    let mut suppressed = vec![false; nodes.len()];
    if !policy.is_enabled() {
        return suppressed;
    }

    let mut live = vec![false; nodes.len()];
    for (index, node) in nodes.iter().enumerate().skip(1).rev() {
        suppressed[index] = if node.columns().is_empty() {
            !live[index]
        } else {
            is_suppressed(policy, node.keys(), node.columns(), values)
        };
        if !suppressed[index]
            && let Some(parent) = node.parent()
        {
            live[parent] = true;
        }
    }

    for (index, node) in nodes.iter().enumerate().skip(1) {
        if node.parent().is_some_and(|parent| suppressed[parent]) {
            suppressed[index] = true;
        }
    }
    suppressed
}

fn identity_component(value: &Value) -> Value {
    value.as_i64().map_or_else(|| value.clone(), Value::I64)
}

fn is_suppressed(policy: NullSuppression, keys: &[usize], columns: &[usize], values: &[Value]) -> bool {
    let all_null = |indices: &[usize]| !indices.is_empty() && indices.iter().all(|&i| values[i].is_null());
    match policy {
        NullSuppression::Never => false,
        NullSuppression::AllAttributes => all_null(columns),
        NullSuppression::KeyOrAllAttributes if keys.is_empty() => all_null(columns),
        NullSuppression::KeyOrAllAttributes => all_null(keys)
    }
}

fn owner_of(attribute: &EntityAttributeDefinition) -> (String, &'static str) {
    attribute.entity().map_or((String::new(), ""), |owner| {
        (owner.container().to_owned(), owner.entity_type().name())
    })
}

fn assignment_error(attribute: &EntityAttributeDefinition, source: AccessError) -> MaterializeError {
    let (container, entity) = owner_of(attribute);
    let name = attribute.result_name();
    error!(
        container = %container,
        entity,
        attribute = %name,
        error = %source,
        "failed to assign attribute"
    );
    match source {
        AccessError::Conversion(source) => MaterializeError::Conversion {
            container,
            entity,
            attribute: name,
            source
        },
        source @ AccessError::TypeMismatch { .. } => MaterializeError::Access {
            container,
            entity,
            attribute: name,
            source
        }
    }
}
