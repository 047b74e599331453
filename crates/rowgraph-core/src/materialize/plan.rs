// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Mapping plans.
//!
//! A [`MappingPlan`] binds the selected attributes of one definition to the
//! column ordinals of one result shape. It is built once per
//! `(target, selection, columns)` and shared through [`PlanCache`].
//!
//! # Structure
//!
//! ```text
//! nodes (shallow → deep)             bindings (selection order)
//! [0] Workflow          ◄─────────── id, name, owner_name
//! [1] User AS CreatedBy ◄─────────── CreatedBy.id, CreatedBy.first_name
//!      parent: 0, link: created_by
//! ```

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering}
    }
};

use dashmap::DashMap;
use tracing::{debug, trace, warn};

use crate::{
    accessor::{Accessor, RelationSetter, ScalarSetter},
    attribute::EntityAttributeDefinition,
    definition::EntityDefinition,
    error::{DefinitionError, MaterializeError},
    info::EntityInfo,
    location::{EntityLocation, EntityReference},
    selection::AttributePath
};

/// Identity of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    target:    EntityReference,
    selection: Option<Vec<AttributePath>>,
    columns:   Vec<String>
}

impl PlanKey {
    /// Key for `target` with `selection` (`None` = all) over `columns`.
    pub const fn new(
        target: EntityReference,
        selection: Option<Vec<AttributePath>>,
        columns: Vec<String>
    ) -> Self {
        Self {
            target,
            selection,
            columns
        }
    }

    /// Target entity reference.
    pub const fn target(&self) -> &EntityReference {
        &self.target
    }

    /// Column names in ordinal order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// How many objects a row populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// Every attribute belongs to the root.
    Flat,
    /// Related objects are created and attached to the root.
    Raised
}

/// One object a row creates.
#[derive(Debug, Clone)]
pub struct PlanNode {
    path:    Vec<EntityLocation>,
    entity:  &'static EntityInfo,
    parent:  Option<usize>,
    link:    Option<RelationSetter>,
    columns: Vec<usize>,
    keys:    Vec<usize>
}

impl PlanNode {
    /// Entity path from the root.
    pub fn path(&self) -> &[EntityLocation] {
        &self.path
    }

    /// Location of this node.
    pub fn location(&self) -> Option<&EntityLocation> {
        self.path.last()
    }

    /// Entity metadata.
    pub const fn entity(&self) -> &'static EntityInfo {
        self.entity
    }

    /// Index of the parent node; `None` for the root.
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Relation setter on the parent.
    pub const fn link(&self) -> Option<RelationSetter> {
        self.link
    }

    /// Indices of bindings owned by this node.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Indices of owned bindings that are primary key columns.
    pub fn keys(&self) -> &[usize] {
        &self.keys
    }

    /// Depth below the root.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// A selected attribute bound to a column.
#[derive(Debug, Clone)]
pub struct Binding {
    attribute: EntityAttributeDefinition,
    ordinal:   usize,
    node:      usize,
    setter:    ScalarSetter
}

impl Binding {
    /// Attribute definition.
    pub const fn attribute(&self) -> &EntityAttributeDefinition {
        &self.attribute
    }

    /// Column ordinal in the row.
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Index of the node holding the property.
    pub const fn node(&self) -> usize {
        self.node
    }

    /// Setter trampoline.
    pub const fn setter(&self) -> ScalarSetter {
        self.setter
    }
}

/// Row-to-graph mapping for one result shape.
pub struct MappingPlan {
    definition: Arc<EntityDefinition>,
    mode:       PlanMode,
    nodes:      Vec<PlanNode>,
    bindings:   Vec<Binding>
}

impl MappingPlan {
    /// Bind `selected` attributes of `definition` to `columns`.
    ///
    /// # Errors
    ///
    /// - [`MaterializeError::ColumnNotFound`] if a result name has no column
    /// - [`MaterializeError::Definition`] if a node has no relation linking it
    ///   to its parent
    pub fn build(
        definition: Arc<EntityDefinition>,
        selected: &[&EntityAttributeDefinition],
        columns: &[String]
    ) -> Result<Self, MaterializeError> {
        let root_name = definition.entity_type().name();
        let mut ordinals: HashMap<&str, usize> = HashMap::with_capacity(columns.len());
        for (ordinal, name) in columns.iter().enumerate() {
            ordinals.entry(name.as_str()).or_insert(ordinal);
        }

        let mut paths: Vec<Vec<EntityLocation>> = vec![vec![definition.location().clone()]];
        for attribute in selected {
            let owner = attribute.entity_path();
            for depth in 1..=owner.len() {
                let prefix = &owner[..depth];
                if !paths.iter().any(|p| p.as_slice() == prefix) {
                    paths.push(prefix.to_vec());
                }
            }
        }
        paths.sort_by_key(Vec::len);

        let mut nodes = Vec::with_capacity(paths.len());
        for path in &paths {
            let parent = path.len().checked_sub(2).and_then(|end| {
                let parent_path = &path[..=end];
                paths.iter().position(|p| p.as_slice() == parent_path)
            });
            let location = path.last().ok_or(DefinitionError::UnknownAttribute {
                entity: root_name,
                path:   String::new()
            })?;
            let link = match parent {
                Some(_) => Some(relation_link(&definition, path)?),
                None => None
            };
            nodes.push(PlanNode {
                path: path.clone(),
                entity: location.entity_type().info(),
                parent,
                link,
                columns: Vec::new(),
                keys: Vec::new()
            });
        }

        let mut bindings = Vec::with_capacity(selected.len());
        for attribute in selected {
            let column = attribute.result_name();
            let ordinal = *ordinals
                .get(column.as_str())
                .ok_or_else(|| MaterializeError::ColumnNotFound {
                    column: column.clone(),
                    entity: root_name
                })?;
            let owner = attribute.entity_path();
            let node = paths
                .iter()
                .position(|p| p.as_slice() == owner)
                .unwrap_or_default();
            let Some(Accessor::Scalar {
                set, ..
            }) = attribute.accessor()
            else {
                return Err(DefinitionError::MissingAccessor {
                    entity:   root_name,
                    property: attribute.property_name()
                }
                .into());
            };

            let index = bindings.len();
            nodes[node].columns.push(index);
            if attribute.is_primary_key() {
                nodes[node].keys.push(index);
            }
            bindings.push(Binding {
                attribute: (*attribute).clone(),
                ordinal,
                node,
                setter: set
            });
        }

        for node in nodes.iter().skip(1) {
            if node.keys.is_empty()
                && let Some(location) = node.location()
            {
                warn!(
                    root = root_name,
                    entity = location.entity_type().name(),
                    alias = location.alias(),
                    "related node has no selected key; identity sharing disabled"
                );
            }
        }

        let mode = if nodes.len() == 1 {
            PlanMode::Flat
        } else {
            PlanMode::Raised
        };
        debug!(
            entity = root_name,
            mode = ?mode,
            nodes = nodes.len(),
            bindings = bindings.len(),
            "built mapping plan"
        );

        Ok(Self {
            definition,
            mode,
            nodes,
            bindings
        })
    }

    /// Definition the plan was built from.
    pub const fn definition(&self) -> &Arc<EntityDefinition> {
        &self.definition
    }

    /// Flat or raised.
    pub const fn mode(&self) -> PlanMode {
        self.mode
    }

    /// Nodes, shallow to deep; index 0 is the root.
    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    /// Bindings in selection order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

impl fmt::Debug for MappingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingPlan")
            .field("entity", &self.definition.entity_type().name())
            .field("mode", &self.mode)
            .field("nodes", &self.nodes.len())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

fn relation_link(
    definition: &EntityDefinition,
    path: &[EntityLocation]
) -> Result<RelationSetter, MaterializeError> {
    let (node, parent) = path.split_last().ok_or(DefinitionError::UnknownAttribute {
        entity: definition.entity_type().name(),
        path:   String::new()
    })?;
    definition
        .relation_attributes()
        .iter()
        .find(|relation| relation.path() == parent && relation.related() == Some(node))
        .and_then(|relation| match relation.accessor() {
            Some(Accessor::Relation {
                set, ..
            }) => Some(set),
            _ => None
        })
        .ok_or_else(|| {
            DefinitionError::UnknownAttribute {
                entity: definition.entity_type().name(),
                path:   node.to_string()
            }
            .into()
        })
}

/// Shared cache of mapping plans with hit and miss counters.
#[derive(Default)]
pub struct PlanCache {
    plans:  DashMap<PlanKey, Arc<MappingPlan>>,
    hits:   AtomicU64,
    misses: AtomicU64
}

impl PlanCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the plan for `key`, building it on first use.
    ///
    /// # Errors
    ///
    /// Whatever `build` returns; nothing is cached on failure.
    pub fn get_or_build(
        &self,
        key: PlanKey,
        build: impl FnOnce() -> Result<MappingPlan, MaterializeError>
    ) -> Result<Arc<MappingPlan>, MaterializeError> {
        if let Some(plan) = self.plans.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(entity = key.target().entity_type().name(), "plan cache hit");
            return Ok(Arc::clone(&plan));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let plan = Arc::new(build()?);
        Ok(Arc::clone(&self.plans.entry(key).or_insert(plan)))
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that built a plan.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Check if no plan is cached.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Drop every plan and reset the counters.
    pub fn clear(&self) {
        self.plans.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanCache")
            .field("plans", &self.plans.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}
