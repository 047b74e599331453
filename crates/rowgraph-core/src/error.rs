// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for definition resolution and row materialization.
//!
//! Errors are grouped by the stage that detects them:
//!
//! | Type | Stage | Typical cause |
//! |------|-------|---------------|
//! | [`ConversionError`] | value conversion | column kind does not fit the property type |
//! | [`AccessError`] | accessor invocation | accessor called with the wrong entity type |
//! | [`ReaderError`] | row reader | unknown column, no current row, provider failure |
//! | [`DefinitionError`] | definition build | missing accessor or physical name |
//! | [`MaterializeError`] | per-row mapping | any of the above, with attribute context |
//!
//! None of these are retried internally. Definition errors indicate a broken
//! mapping and surface on first resolution; materialization errors are fatal
//! for the current read.

use thiserror::Error;

use crate::value::ValueKind;

/// Failure converting a [`Value`](crate::Value) into a property type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A `NULL` cell was assigned to a non-optional property.
    #[error("unexpected NULL for non-optional {expected} property")]
    UnexpectedNull {
        /// Kind the property requires.
        expected: ValueKind
    },

    /// The cell kind cannot be widened into the property kind.
    #[error("cannot convert {found} into {expected}")]
    Mismatch {
        /// Kind the property requires.
        expected: ValueKind,
        /// Kind the row produced.
        found:    ValueKind
    },

    /// The value does not fit the target numeric range.
    #[error("value {value} is out of range for {expected}")]
    OutOfRange {
        /// Kind the property requires.
        expected: ValueKind,
        /// Rendered source value.
        value:    String
    },

    /// Text could not be parsed into the target kind.
    #[error("cannot parse {value:?} as {expected}")]
    Parse {
        /// Kind the property requires.
        expected: ValueKind,
        /// Source text.
        value:    String
    }
}

impl ConversionError {
    /// Check if this error was caused by a `NULL` cell.
    pub const fn is_unexpected_null(&self) -> bool {
        matches!(self, Self::UnexpectedNull { .. })
    }
}

/// Failure invoking a generated property accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The accessor received an entity of a different type.
    #[error("accessor for `{expected}.{property}` received a different entity type")]
    TypeMismatch {
        /// Type the accessor was generated for.
        expected: &'static str,
        /// Property the accessor belongs to.
        property: &'static str
    },

    /// The setter could not convert the incoming value.
    #[error(transparent)]
    Conversion(#[from] ConversionError)
}

/// Failure reported by a [`RowReader`](crate::RowReader).
#[derive(Debug, Error)]
pub enum ReaderError {
    /// No column with the given name exists in the current result.
    #[error("column `{0}` not found")]
    ColumnNotFound(String),

    /// The ordinal is outside `0..field_count`.
    #[error("ordinal {ordinal} out of range for {field_count} columns")]
    OrdinalOutOfRange {
        /// Requested ordinal.
        ordinal:     usize,
        /// Number of columns in the result.
        field_count: usize
    },

    /// A value was requested before `read()` or after the last row.
    #[error("reader is not positioned on a row")]
    NoCurrentRow,

    /// A typed getter could not convert the cell.
    #[error("column {ordinal}: {source}")]
    Conversion {
        /// Column ordinal.
        ordinal: usize,
        /// Underlying conversion failure.
        #[source]
        source:  ConversionError
    },

    /// Error raised by the underlying database provider.
    #[error("provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>)
}

/// Failure building an entity definition.
///
/// Always fatal: the entity metadata itself is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// A mapped property has no accessor binding.
    #[error("property `{entity}.{property}` has no accessor")]
    MissingAccessor {
        /// Declaring entity type.
        entity:   &'static str,
        /// Property name.
        property: &'static str
    },

    /// A mapped property resolved to an empty physical name.
    #[error("property `{entity}.{property}` has an empty physical name")]
    MissingPhysicalName {
        /// Declaring entity type.
        entity:   &'static str,
        /// Property name.
        property: &'static str
    },

    /// More than one direct identity column was declared.
    #[error("entity `{entity}` declares more than one auto-number key (`{first}`, `{second}`)")]
    MultipleAutoNumberKeys {
        /// Entity type.
        entity: &'static str,
        /// First identity column.
        first:  &'static str,
        /// Second identity column.
        second: &'static str
    },

    /// Two distinct property paths resolve to the same result column.
    #[error("entity `{entity}` maps both `{first}` and `{second}` to `{name}`")]
    AmbiguousAlias {
        /// Root entity type.
        entity: &'static str,
        /// Shared result column name.
        name:   String,
        /// Dotted path resolved first.
        first:  String,
        /// Dotted path resolved second.
        second: String
    },

    /// A property path does not resolve against the definition.
    #[error("entity `{entity}` has no attribute at path `{path}`")]
    UnknownAttribute {
        /// Root entity type.
        entity: &'static str,
        /// Dotted property path.
        path:   String
    }
}

/// Failure materializing a row.
///
/// Carries the container, entity and attribute that failed so a broken
/// mapping can be located without a debugger.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The target entity definition could not be built.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// A planned attribute has no column in the row.
    #[error("column `{column}` for `{entity}` not found in result")]
    ColumnNotFound {
        /// Expected result column name.
        column: String,
        /// Root entity type.
        entity: &'static str
    },

    /// A column value could not be converted into the property type.
    #[error("cannot assign `{container}.{entity}.{attribute}`: {source}")]
    Conversion {
        /// Container (schema) of the owning entity.
        container: String,
        /// Owning entity type.
        entity:    &'static str,
        /// Attribute reference name.
        attribute: String,
        /// Underlying conversion failure.
        #[source]
        source:    ConversionError
    },

    /// An accessor failed for a reason other than conversion.
    #[error("accessor failed on `{container}.{entity}.{attribute}`: {source}")]
    Access {
        /// Container (schema) of the owning entity.
        container: String,
        /// Owning entity type.
        entity:    &'static str,
        /// Attribute reference name.
        attribute: String,
        /// Underlying accessor failure.
        #[source]
        source:    AccessError
    },

    /// The row reader failed.
    #[error(transparent)]
    Reader(#[from] ReaderError),

    /// A dynamic record was asked for an attribute it does not carry.
    #[error("attribute `{0}` not found")]
    AttributeNotFound(String),

    /// The constructed root did not have the requested type.
    #[error("materialized root is not a `{0}`")]
    UnexpectedEntity(&'static str)
}

impl MaterializeError {
    /// Check if this error originates from definition resolution.
    pub const fn is_definition(&self) -> bool {
        matches!(self, Self::Definition(_))
    }

    /// Check if this error is a missing attribute on a dynamic record.
    pub const fn is_attribute_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound(_))
    }
}
