// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `sqlx` Postgres row reader.
//!
//! Cells are decoded by Postgres type name:
//!
//! | Postgres | Value |
//! |----------|-------|
//! | `BOOL` | `Bool` |
//! | `INT2` / `INT4` / `INT8` | `I16` / `I32` / `I64` |
//! | `FLOAT4` / `FLOAT8` | `F32` / `F64` |
//! | `NUMERIC` | `Decimal` |
//! | `TEXT`, `VARCHAR`, `BPCHAR`, `NAME` | `Text` |
//! | `UUID` | `Uuid` |
//! | `TIMESTAMPTZ`, `TIMESTAMP` | `DateTime` (naive timestamps read as UTC) |
//! | `DATE` | `Date` |
//! | `BYTEA` | `Bytes` |

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Column, Row, TypeInfo, ValueRef, postgres::PgRow};
use uuid::Uuid;

use super::RowReader;
use crate::{error::ReaderError, value::Value};

/// Reader over rows fetched with `sqlx`.
///
/// # Example
///
/// ```rust,ignore
/// let rows = sqlx::query("SELECT id, name FROM workflows").fetch_all(&pool).await?;
/// let reader = PgRowReader::new(rows);
/// let workflows: Vec<Workflow> = materializer.rows(reader).collect::<Result<_, _>>()?;
/// ```
#[derive(Debug)]
pub struct PgRowReader {
    columns: Vec<String>,
    rows:    std::vec::IntoIter<PgRow>,
    current: Option<PgRow>
}

impl PgRowReader {
    /// Wrap fetched rows. Column names come from the first row.
    pub fn new(rows: Vec<PgRow>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_owned()).collect())
            .unwrap_or_default();
        Self {
            columns,
            rows: rows.into_iter(),
            current: None
        }
    }

    fn row(&self, ordinal: usize) -> Result<&PgRow, ReaderError> {
        let row = self.current.as_ref().ok_or(ReaderError::NoCurrentRow)?;
        if ordinal >= self.columns.len() {
            return Err(ReaderError::OrdinalOutOfRange {
                ordinal,
                field_count: self.columns.len()
            });
        }
        Ok(row)
    }
}

macro_rules! decode {
    ($row:expr, $ordinal:expr, $ty:ty, $variant:expr) => {
        $row.try_get::<Option<$ty>, _>($ordinal)
            .map(|cell| cell.map_or(Value::Null, $variant))
    };
}

fn decode(row: &PgRow, ordinal: usize) -> Result<Value, ReaderError> {
    let type_name = row.column(ordinal).type_info().name();
    let decoded = match type_name {
        "BOOL" => decode!(row, ordinal, bool, Value::Bool),
        "INT2" => decode!(row, ordinal, i16, Value::I16),
        "INT4" => decode!(row, ordinal, i32, Value::I32),
        "INT8" => decode!(row, ordinal, i64, Value::I64),
        "FLOAT4" => decode!(row, ordinal, f32, Value::F32),
        "FLOAT8" => decode!(row, ordinal, f64, Value::F64),
        "NUMERIC" => decode!(row, ordinal, Decimal, Value::Decimal),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => decode!(row, ordinal, String, Value::Text),
        "UUID" => decode!(row, ordinal, Uuid, Value::Uuid),
        "TIMESTAMPTZ" => decode!(row, ordinal, DateTime<Utc>, Value::DateTime),
        "TIMESTAMP" => decode!(row, ordinal, NaiveDateTime, |stamp: NaiveDateTime| {
            Value::DateTime(stamp.and_utc())
        }),
        "DATE" => decode!(row, ordinal, NaiveDate, Value::Date),
        "BYTEA" => decode!(row, ordinal, Vec<u8>, Value::Bytes),
        other => {
            return Err(ReaderError::Provider(
                format!("unsupported Postgres type `{other}` at column {ordinal}").into()
            ));
        }
    };
    decoded.map_err(|err| ReaderError::Provider(Box::new(err)))
}

impl RowReader for PgRowReader {
    fn read(&mut self) -> Result<bool, ReaderError> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
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
        let row = self.row(ordinal)?;
        row.try_get_raw(ordinal)
            .map(|raw| raw.is_null())
            .map_err(|err| ReaderError::Provider(Box::new(err)))
    }

    fn get_value(&self, ordinal: usize) -> Result<Value, ReaderError> {
        decode(self.row(ordinal)?, ordinal)
    }
}
