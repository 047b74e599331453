// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Definition resolution.
//!
//! [`EntityDefinitionProvider`] turns an [`EntityReference`] into attribute
//! definitions. [`DerivedDefinitionProvider`] is the implementation backed
//! by `#[derive(Entity)]` metadata.
//!
//! # Resolution Walk
//!
//! ```text
//! Workflow (root)
//! ├── id, name                 DIRECT_ATTRIBUTE (+ key flags)
//! ├── owner_name               RELATED | EXPLICIT_RELATED, virtual node
//! └── created_by               RELATION, then recurse:
//!     └── User AS CreatedBy
//!         ├── id, first_name   RELATED_ATTRIBUTE (+ key flags)
//!         └── ...
//! ```
//!
//! Nested relations are aliased under their owner (`CreatedBy.Dept`), so
//! every path yields its own node. Two distinct paths that still land on the
//! same column name fail with [`DefinitionError::AmbiguousAlias`].
//!
//! A relation whose `(type, alias)` already appears on the current path is
//! kept as an attribute but not expanded again. The walk also stops at
//! [`ResolverConfig::max_relation_depth`].

use std::{
    any::TypeId,
    collections::{HashMap, hash_map::Entry},
    fmt,
    sync::Arc
};

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::{
    accessor::{Accessor, AccessorCache},
    attribute::{AttributeFlags, EntityAttributeDefinition},
    config::ResolverConfig,
    definition::EntityDefinition,
    error::DefinitionError,
    info::{Entity, EntityInfo, PropertyInfo, PropertyKind},
    location::{EntityLocation, EntityReference, EntityType}
};

/// Source of entity definitions.
///
/// Object safe; the materializer holds it as
/// `Arc<dyn EntityDefinitionProvider>`.
pub trait EntityDefinitionProvider: Send + Sync {
    /// Resolve every attribute reachable from `reference`, uncached.
    ///
    /// # Errors
    ///
    /// [`DefinitionError`] if the entity metadata is unusable.
    fn resolve_definitions(
        &self,
        reference: &EntityReference
    ) -> Result<Vec<EntityAttributeDefinition>, DefinitionError>;

    /// Location of the referenced root entity.
    fn entity_location(&self, reference: &EntityReference) -> EntityLocation;

    /// Resolve the cached definition for `reference`.
    ///
    /// # Errors
    ///
    /// [`DefinitionError`] if the entity metadata is unusable.
    fn resolve(&self, reference: &EntityReference) -> Result<Arc<EntityDefinition>, DefinitionError>;
}

impl dyn EntityDefinitionProvider {
    /// Resolve the unaliased definition of `T`.
    ///
    /// # Errors
    ///
    /// [`DefinitionError`] if the entity metadata is unusable.
    pub fn resolve_of<T: Entity>(&self) -> Result<Arc<EntityDefinition>, DefinitionError> {
        self.resolve(&EntityReference::of::<T>())
    }
}

/// Shared map of resolved definitions.
///
/// Concurrent first resolutions of the same reference may both compute;
/// the first inserted definition wins and every caller receives it.
#[derive(Debug, Default)]
pub struct DefinitionCache {
    definitions: DashMap<EntityReference, Arc<EntityDefinition>>
}

impl DefinitionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached definition for `reference`, if resolved.
    pub fn get(&self, reference: &EntityReference) -> Option<Arc<EntityDefinition>> {
        self.definitions.get(reference).map(|entry| Arc::clone(&entry))
    }

    /// Return the cached definition or build and insert one.
    ///
    /// `build` runs without holding a shard lock.
    ///
    /// # Errors
    ///
    /// Whatever `build` returns; nothing is cached on failure.
    pub fn get_or_try_insert_with<E>(
        &self,
        reference: &EntityReference,
        build: impl FnOnce() -> Result<EntityDefinition, E>
    ) -> Result<Arc<EntityDefinition>, E> {
        if let Some(found) = self.get(reference) {
            trace!(entity = reference.entity_type().name(), "definition cache hit");
            return Ok(found);
        }
        let built = Arc::new(build()?);
        Ok(Arc::clone(
            &self.definitions.entry(reference.clone()).or_insert(built)
        ))
    }

    /// Number of cached definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Drop every cached definition.
    pub fn clear(&self) {
        self.definitions.clear();
    }
}

/// Provider backed by [`Entity`] metadata.
///
/// # Example
///
/// ```rust,ignore
/// use rowgraph::prelude::*;
///
/// let provider = DerivedDefinitionProvider::new();
/// let definition = provider.resolve(&EntityReference::of::<Workflow>())?;
/// for attribute in definition.returnable_attributes() {
///     println!("{} -> {}", attribute.dotted_path(), attribute.result_name());
/// }
/// ```
#[derive(Clone, Default)]
pub struct DerivedDefinitionProvider {
    config:      ResolverConfig,
    accessors:   Arc<AccessorCache>,
    definitions: Arc<DefinitionCache>
}

impl DerivedDefinitionProvider {
    /// Provider with default configuration and private caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with custom configuration and private caches.
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Provider sharing caches with other providers.
    pub const fn with_caches(
        config: ResolverConfig,
        accessors: Arc<AccessorCache>,
        definitions: Arc<DefinitionCache>
    ) -> Self {
        Self {
            config,
            accessors,
            definitions
        }
    }

    /// Resolver configuration.
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Accessor cache.
    pub const fn accessor_cache(&self) -> &Arc<AccessorCache> {
        &self.accessors
    }

    /// Definition cache.
    pub const fn definition_cache(&self) -> &Arc<DefinitionCache> {
        &self.definitions
    }

    fn location_of(&self, info: &'static EntityInfo) -> EntityLocation {
        EntityLocation::new(
            EntityType::from_info(info),
            info.container.unwrap_or(&self.config.default_container),
            info.name.unwrap_or(info.type_name)
        )
    }
}

impl fmt::Debug for DerivedDefinitionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedDefinitionProvider")
            .field("config", &self.config)
            .field("definitions", &self.definitions.len())
            .finish_non_exhaustive()
    }
}

impl EntityDefinitionProvider for DerivedDefinitionProvider {
    fn resolve_definitions(
        &self,
        reference: &EntityReference
    ) -> Result<Vec<EntityAttributeDefinition>, DefinitionError> {
        let root = self.entity_location(reference);
        let info = reference.entity_type().info();
        let mut walk = Walk {
            provider:  self,
            root:      info.type_name,
            out:       Vec::new(),
            seen:      HashMap::new(),
            auto_key:  None,
            relations: Vec::new(),
            links:     Vec::new(),
            visiting:  vec![(info.id(), reference.alias().map(str::to_owned))]
        };
        walk.visit(info, vec![root])?;

        let attributes: Vec<_> = walk
            .out
            .into_iter()
            .enumerate()
            .map(|(ordinal, attribute)| attribute.with_ordinal(ordinal))
            .collect();
        debug!(
            entity = info.type_name,
            alias = reference.alias(),
            attributes = attributes.len(),
            "resolved entity definition"
        );
        Ok(attributes)
    }

    fn entity_location(&self, reference: &EntityReference) -> EntityLocation {
        let location = self.location_of(reference.entity_type().info());
        match reference.alias() {
            Some(alias) => location.with_alias(alias),
            None => location
        }
    }

    fn resolve(&self, reference: &EntityReference) -> Result<Arc<EntityDefinition>, DefinitionError> {
        self.definitions.get_or_try_insert_with(reference, || {
            let attributes = self.resolve_definitions(reference)?;
            Ok(EntityDefinition::new(
                reference.clone(),
                self.entity_location(reference),
                attributes
            ))
        })
    }
}

/// Depth-first state of one resolution.
struct Walk<'a> {
    provider:  &'a DerivedDefinitionProvider,
    root:      &'static str,
    out:       Vec<EntityAttributeDefinition>,
    seen:      HashMap<(EntityLocation, &'static str), String>,
    auto_key:  Option<&'static str>,
    relations: Vec<&'static str>,
    links:     Vec<Accessor>,
    visiting:  Vec<(TypeId, Option<String>)>
}

impl Walk<'_> {
    fn visit(&mut self, info: &'static EntityInfo, path: Vec<EntityLocation>) -> Result<(), DefinitionError> {
        let shared: Arc<[EntityLocation]> = Arc::from(path.clone());
        let links: Arc<[Accessor]> = Arc::from(self.links.clone());
        let is_root = path.len() == 1;

        for property in info.properties {
            let accessor = self.provider.accessors.bind(info, property.name)?;
            let physical = property.column.unwrap_or(property.name);
            if physical.is_empty() {
                return Err(DefinitionError::MissingPhysicalName {
                    entity:   info.type_name,
                    property: property.name
                });
            }

            match property.kind {
                PropertyKind::Scalar => {
                    let role = if is_root {
                        AttributeFlags::DIRECT_ATTRIBUTE
                    } else {
                        AttributeFlags::RELATED_ATTRIBUTE
                    };
                    let flags = property.flags | role;
                    if is_root && flags.contains(AttributeFlags::IDENTITY_COLUMN) {
                        self.claim_auto_key(property.name)?;
                    }
                    let attribute = EntityAttributeDefinition::new(
                        property.name,
                        physical,
                        Arc::clone(&shared),
                        accessor
                    )
                    .with_alias(property.alias)
                    .with_flags(flags)
                    .with_value_kind(property.value_kind)
                    .with_relation_path(&self.relations, Arc::clone(&links));
                    self.push(attribute)?;
                }
                PropertyKind::Related {
                    entity,
                    alias
                } => {
                    let mut node = self.provider.location_of(entity());
                    if let Some(alias) = alias {
                        node = node.with_alias(alias);
                    }
                    let mut virtual_path = path.clone();
                    virtual_path.push(node.into_virtual());

                    let flags = property.flags
                        | AttributeFlags::RELATED_ATTRIBUTE
                        | AttributeFlags::EXPLICIT_RELATED_ATTRIBUTE;
                    let attribute_alias = property
                        .alias
                        .or((physical != property.name).then_some(property.name));
                    let attribute = EntityAttributeDefinition::new(
                        property.name,
                        physical,
                        Arc::from(virtual_path),
                        accessor
                    )
                    .with_alias(attribute_alias)
                    .with_flags(flags)
                    .with_value_kind(property.value_kind)
                    .with_relation_path(&self.relations, Arc::clone(&links));
                    self.push(attribute)?;
                }
                PropertyKind::Relation {
                    entity,
                    alias
                } => {
                    let target = entity();
                    let alias = alias.unwrap_or(property.name);
                    let node = self
                        .provider
                        .location_of(target)
                        .with_alias(nested_alias(&path, alias));

                    let attribute = EntityAttributeDefinition::new(
                        property.name,
                        physical,
                        Arc::clone(&shared),
                        accessor
                    )
                    .with_flags(property.flags | AttributeFlags::RELATION)
                    .with_related(node.clone())
                    .with_relation_path(&self.relations, Arc::clone(&links));
                    self.push(attribute)?;

                    self.expand(property, accessor, target, alias, &path, node)?;
                }
            }
        }
        Ok(())
    }

    fn expand(
        &mut self,
        property: &'static PropertyInfo,
        accessor: Accessor,
        target: &'static EntityInfo,
        alias: &'static str,
        path: &[EntityLocation],
        node: EntityLocation
    ) -> Result<(), DefinitionError> {
        let key = (target.id(), Some(alias.to_owned()));
        if self.visiting.contains(&key) {
            trace!(
                entity = target.type_name,
                alias,
                "relation cycle boundary, not expanded"
            );
            return Ok(());
        }
        if self.relations.len() >= self.provider.config.max_relation_depth {
            debug!(
                entity = target.type_name,
                alias,
                depth = self.relations.len(),
                "relation depth bound reached, not expanded"
            );
            return Ok(());
        }

        let mut nested = path.to_vec();
        nested.push(node);
        self.relations.push(property.name);
        self.links.push(accessor);
        self.visiting.push(key);

        let result = self.visit(target, nested);

        self.visiting.pop();
        self.links.pop();
        self.relations.pop();
        result
    }

    fn claim_auto_key(&mut self, property: &'static str) -> Result<(), DefinitionError> {
        match self.auto_key {
            Some(first) => Err(DefinitionError::MultipleAutoNumberKeys {
                entity: self.root,
                first,
                second: property
            }),
            None => {
                self.auto_key = Some(property);
                Ok(())
            }
        }
    }

    fn push(&mut self, attribute: EntityAttributeDefinition) -> Result<(), DefinitionError> {
        let Some(node) = attribute.reference_node().cloned() else {
            return Ok(());
        };
        let path = attribute.dotted_path();
        match self.seen.entry((node, attribute.reference_name())) {
            Entry::Vacant(slot) => {
                slot.insert(path);
                self.out.push(attribute);
                Ok(())
            }
            Entry::Occupied(taken) if *taken.get() == path => {
                trace!(
                    attribute = %attribute,
                    "duplicate attribute dropped"
                );
                Ok(())
            }
            Entry::Occupied(taken) => Err(DefinitionError::AmbiguousAlias {
                entity: self.root,
                name:   attribute.result_name(),
                first:  taken.get().clone(),
                second: path
            })
        }
    }
}

/// Join alias of a relation reached from `path`.
///
/// Relations below the root are qualified with the alias of the node that
/// owns them (`ModifiedBy.Dept`), so two paths to the same entity type never
/// share a node.
fn nested_alias(path: &[EntityLocation], alias: &str) -> String {
    match path.last().and_then(EntityLocation::alias) {
        Some(parent) if path.len() > 1 => format!("{parent}.{alias}"),
        _ => alias.to_owned()
    }
}
