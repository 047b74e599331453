// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dynamic subset results.

use std::fmt;

use crate::{
    error::MaterializeError,
    selection::AttributePath,
    value::{FromValue, Value}
};

/// One requested attribute of a dynamic record.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicField {
    name:      String,
    path:      Vec<&'static str>,
    container: String,
    entity:    &'static str,
    value:     Value
}

impl DynamicField {
    pub(crate) const fn new(
        name: String,
        path: Vec<&'static str>,
        container: String,
        entity: &'static str,
        value: Value
    ) -> Self {
        Self {
            name,
            path,
            container,
            entity,
            value
        }
    }

    /// Result column name (`"CreatedBy.first_name"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property path from the root.
    pub fn path(&self) -> &[&'static str] {
        &self.path
    }

    /// Cell value.
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

/// A sparse record holding only the requested attributes.
///
/// Attributes are addressed by result name or by property path. Asking for
/// anything that was not requested fails with
/// [`MaterializeError::AttributeNotFound`].
///
/// # Example
///
/// ```rust,ignore
/// let record = materializer.materialize_dynamic(&selection, &reader)?;
/// let name: String = record.value(Field::NAME)?;
/// assert!(record.value::<String>(Field::ID).is_err());
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct DynamicRecord {
    fields: Vec<DynamicField>
}

impl DynamicRecord {
    pub(crate) const fn new(fields: Vec<DynamicField>) -> Self {
        Self {
            fields
        }
    }

    /// Value by result name or dotted property path.
    ///
    /// # Errors
    ///
    /// [`MaterializeError::AttributeNotFound`] if not requested.
    pub fn get(&self, name: &str) -> Result<&Value, MaterializeError> {
        self.fields
            .iter()
            .find(|f| f.name == name || f.path.join(".") == name)
            .map(DynamicField::value)
            .ok_or_else(|| MaterializeError::AttributeNotFound(name.to_owned()))
    }

    /// Typed value by property path.
    ///
    /// # Errors
    ///
    /// - [`MaterializeError::AttributeNotFound`] if not requested
    /// - [`MaterializeError::Conversion`] if the value does not convert
    pub fn value<V: FromValue>(&self, path: impl Into<AttributePath>) -> Result<V, MaterializeError> {
        let path = path.into();
        let field = self
            .fields
            .iter()
            .find(|f| f.path == path.segments())
            .ok_or_else(|| MaterializeError::AttributeNotFound(path.to_string()))?;
        V::from_value(field.value.clone()).map_err(|source| MaterializeError::Conversion {
            container: field.container.clone(),
            entity: field.entity,
            attribute: field.name.clone(),
            source
        })
    }

    /// Check if `name` was requested.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Requested fields in selection order.
    pub fn fields(&self) -> &[DynamicField] {
        &self.fields
    }

    /// Number of requested attributes.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for DynamicRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|field| (&field.name, &field.value)))
            .finish()
    }
}
