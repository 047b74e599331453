// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory row reader.

use super::RowReader;
use crate::{
    definition::EntityDefinition,
    error::{AccessError, ReaderError},
    info::Entity,
    value::Value
};

/// Rows held in memory.
///
/// # Example
///
/// ```rust
/// use rowgraph_core::{MemoryRowReader, RowReader, Value};
///
/// let mut reader = MemoryRowReader::new(["Name", "Description"])
///     .with_row(vec![Value::from("MahField"), Value::Null]);
///
/// assert!(reader.read().unwrap());
/// assert_eq!(reader.get_string(0).unwrap(), "MahField");
/// assert!(reader.is_null(1).unwrap());
/// assert!(!reader.read().unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRowReader {
    columns: Vec<String>,
    rows:    Vec<Vec<Value>>,
    next:    usize,
    current: Option<usize>
}

impl MemoryRowReader {
    /// Reader with the given columns and no rows.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Append a row. Short rows are padded with `NULL`.
    #[must_use]
    pub fn with_row(mut self, values: Vec<Value>) -> Self {
        self.push_row(values);
        self
    }

    /// Append a row. Short rows are padded with `NULL`; long rows are cut.
    pub fn push_row(&mut self, mut values: Vec<Value>) {
        values.resize(self.columns.len(), Value::Null);
        self.rows.push(values);
    }

    /// One row per item, one column per returnable attribute.
    ///
    /// Column names are the attributes' result names, so the reader feeds
    /// straight back into a materializer for the same definition.
    ///
    /// # Errors
    ///
    /// [`AccessError`] if an item is not the definition's root type.
    pub fn from_entities<T: Entity>(definition: &EntityDefinition, items: &[T]) -> Result<Self, AccessError> {
        let attributes = definition.returnable_attributes();
        let mut reader = Self::new(attributes.iter().map(|a| a.result_name()));
        for item in items {
            let row = attributes
                .iter()
                .map(|a| a.read_value(item))
                .collect::<Result<Vec<_>, _>>()?;
            reader.push_row(row);
        }
        Ok(reader)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn cell(&self, ordinal: usize) -> Result<&Value, ReaderError> {
        let row = self
            .current
            .and_then(|index| self.rows.get(index))
            .ok_or(ReaderError::NoCurrentRow)?;
        row.get(ordinal).ok_or(ReaderError::OrdinalOutOfRange {
            ordinal,
            field_count: self.columns.len()
        })
    }
}

impl RowReader for MemoryRowReader {
    fn read(&mut self) -> Result<bool, ReaderError> {
        if self.next < self.rows.len() {
            self.current = Some(self.next);
            self.next += 1;
            Ok(true)
        } else {
            self.current = None;
            Ok(false)
        }
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn get_name(&self, ordinal: usize) -> Result<&str, ReaderError> {
        self.columns
            .get(ordinal)
            .map(String::as_str)
            .ok_or(ReaderError::OrdinalOutOfRange {
                ordinal,
                field_count: self.columns.len()
            })
    }

    fn get_ordinal(&self, name: &str) -> Result<usize, ReaderError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ReaderError::ColumnNotFound(name.to_owned()))
    }

    fn is_null(&self, ordinal: usize) -> Result<bool, ReaderError> {
        self.cell(ordinal).map(Value::is_null)
    }

    fn get_value(&self, ordinal: usize) -> Result<Value, ReaderError> {
        self.cell(ordinal).cloned()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        location::EntityReference,
        provider::{DerivedDefinitionProvider, EntityDefinitionProvider},
        test_fixtures::Field
    };

    fn reader() -> MemoryRowReader {
        MemoryRowReader::new(["id", "amount", "flag"])
            .with_row(vec![Value::I64(7), Value::I32(12), Value::I32(1)])
            .with_row(vec![Value::I16(8)])
    }

    #[test]
    fn cursor_moves_forward_only() {
        let mut reader = reader();
        assert_matches!(reader.get_value(0), Err(ReaderError::NoCurrentRow));
        assert!(reader.read().unwrap());
        assert!(reader.read().unwrap());
        assert!(!reader.read().unwrap());
        assert!(!reader.read().unwrap());
        assert_matches!(reader.get_value(0), Err(ReaderError::NoCurrentRow));
    }

    #[test]
    fn typed_getters_widen() {
        let mut reader = reader();
        reader.read().unwrap();
        assert_eq!(reader.get_i32(0).unwrap(), 7);
        assert_eq!(reader.get_decimal(1).unwrap(), Decimal::from(12));
        assert!(reader.get_bool(2).unwrap());
        assert_matches!(
            reader.get_string(0),
            Err(ReaderError::Conversion { ordinal: 0, .. })
        );

        reader.read().unwrap();
        assert_eq!(reader.get_i16(0).unwrap(), 8);
        assert!(reader.is_null(1).unwrap());
        assert_eq!(reader.get::<Option<i64>>(2).unwrap(), None);
    }

    #[test]
    fn names_and_ordinals() {
        let reader = reader();
        assert_eq!(reader.field_count(), 3);
        assert_eq!(reader.get_name(1).unwrap(), "amount");
        assert_eq!(reader.get_ordinal("flag").unwrap(), 2);
        assert_eq!(reader.column_names(), ["id", "amount", "flag"]);
        assert_matches!(reader.get_ordinal("nope"), Err(ReaderError::ColumnNotFound(name)) if name == "nope");
        assert_matches!(
            reader.get_name(9),
            Err(ReaderError::OrdinalOutOfRange { ordinal: 9, field_count: 3 })
        );
    }

    #[test]
    fn from_entities_uses_result_names() {
        let definition = DerivedDefinitionProvider::new()
            .resolve(&EntityReference::of::<Field>())
            .unwrap();
        let items = [Field {
            id:          1,
            name:        "MahField".into(),
            description: Some("Mah Field Description".into())
        }];
        let mut reader = MemoryRowReader::from_entities(&definition, &items).unwrap();
        assert_eq!(reader.len(), 1);
        reader.read().unwrap();
        let ordinal = reader.get_ordinal("Name").unwrap();
        assert_eq!(reader.get_string(ordinal).unwrap(), "MahField");
    }
}
