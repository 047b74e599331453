// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Forward-only row readers.
//!
//! The materializer consumes rows through [`RowReader`]: a cursor over a
//! result with named, ordinal-addressed columns.
//!
//! | Reader | Source |
//! |--------|--------|
//! | [`MemoryRowReader`] | in-memory rows, fixtures, round-trip tests |
//! | `PgRowReader` | `sqlx` Postgres rows (feature `postgres`) |

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::MemoryRowReader;
#[cfg(feature = "postgres")]
pub use postgres::PgRowReader;
use rust_decimal::Decimal;

use crate::{
    error::ReaderError,
    value::{FromValue, Value}
};

/// Cursor over a tabular result.
///
/// `read` advances to the next row; every other method addresses the
/// current row. Readers are forward-only.
pub trait RowReader {
    /// Advance to the next row. Returns `false` past the last row.
    ///
    /// # Errors
    ///
    /// [`ReaderError::Provider`] if the underlying source fails.
    fn read(&mut self) -> Result<bool, ReaderError>;

    /// Number of columns.
    fn field_count(&self) -> usize;

    /// Column name at `ordinal`.
    ///
    /// # Errors
    ///
    /// [`ReaderError::OrdinalOutOfRange`] for an unknown ordinal.
    fn get_name(&self, ordinal: usize) -> Result<&str, ReaderError>;

    /// Ordinal of the column named `name`.
    ///
    /// # Errors
    ///
    /// [`ReaderError::ColumnNotFound`] for an unknown name.
    fn get_ordinal(&self, name: &str) -> Result<usize, ReaderError>;

    /// Check if the cell at `ordinal` is `NULL`.
    ///
    /// # Errors
    ///
    /// [`ReaderError::NoCurrentRow`] or [`ReaderError::OrdinalOutOfRange`].
    fn is_null(&self, ordinal: usize) -> Result<bool, ReaderError>;

    /// Cell at `ordinal`.
    ///
    /// # Errors
    ///
    /// [`ReaderError::NoCurrentRow`] or [`ReaderError::OrdinalOutOfRange`].
    fn get_value(&self, ordinal: usize) -> Result<Value, ReaderError>;

    /// Cell at `ordinal` converted into `T`.
    ///
    /// # Errors
    ///
    /// [`ReaderError::Conversion`] if the cell does not convert.
    fn get<T: FromValue>(&self, ordinal: usize) -> Result<T, ReaderError>
    where
        Self: Sized
    {
        let value = self.get_value(ordinal)?;
        T::from_value(value).map_err(|source| ReaderError::Conversion {
            ordinal,
            source
        })
    }

    /// Cell as `i16`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    fn get_i16(&self, ordinal: usize) -> Result<i16, ReaderError>
    where
        Self: Sized
    {
        self.get(ordinal)
    }

    /// Cell as `i32`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    fn get_i32(&self, ordinal: usize) -> Result<i32, ReaderError>
    where
        Self: Sized
    {
        self.get(ordinal)
    }

    /// Cell as `i64`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    fn get_i64(&self, ordinal: usize) -> Result<i64, ReaderError>
    where
        Self: Sized
    {
        self.get(ordinal)
    }

    /// Cell as `String`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    fn get_string(&self, ordinal: usize) -> Result<String, ReaderError>
    where
        Self: Sized
    {
        self.get(ordinal)
    }

    /// Cell as `bool`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    fn get_bool(&self, ordinal: usize) -> Result<bool, ReaderError>
    where
        Self: Sized
    {
        self.get(ordinal)
    }

    /// Cell as `Decimal`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    fn get_decimal(&self, ordinal: usize) -> Result<Decimal, ReaderError>
    where
        Self: Sized
    {
        self.get(ordinal)
    }

    /// Column names in ordinal order.
    fn column_names(&self) -> Vec<String> {
        (0..self.field_count())
            .filter_map(|ordinal| self.get_name(ordinal).ok().map(str::to_owned))
            .collect()
    }
}

impl<R: RowReader + ?Sized> RowReader for &mut R {
    fn read(&mut self) -> Result<bool, ReaderError> {
        (**self).read()
    }

    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn get_name(&self, ordinal: usize) -> Result<&str, ReaderError> {
        (**self).get_name(ordinal)
    }

    fn get_ordinal(&self, name: &str) -> Result<usize, ReaderError> {
        (**self).get_ordinal(name)
    }

    fn is_null(&self, ordinal: usize) -> Result<bool, ReaderError> {
        (**self).is_null(ordinal)
    }

    fn get_value(&self, ordinal: usize) -> Result<Value, ReaderError> {
        (**self).get_value(ordinal)
    }

    fn column_names(&self) -> Vec<String> {
        (**self).column_names()
    }
}
