// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Lazy row iteration.
//!
//! Each iterator owns its reader and one [`IdentityCache`], so related
//! objects are shared across the rows of a single pass only. Iteration is
//! forward-only and stops after the first error.

use std::{fmt, iter::FusedIterator};

use super::{DynamicRecord, IdentityCache, Materializer};
use crate::{error::MaterializeError, info::Entity, reader::RowReader, selection::AttributeSelection};

/// Iterator over rows materialized as `T`.
pub struct Rows<T, R> {
    materializer: Materializer,
    reader:       R,
    identities:   IdentityCache,
    selection:    AttributeSelection<T>,
    done:         bool
}

impl<T: Entity, R: RowReader> Rows<T, R> {
    pub(super) fn new(materializer: Materializer, reader: R, selection: AttributeSelection<T>) -> Self {
        Self {
            materializer,
            reader,
            identities: IdentityCache::new(),
            selection,
            done: false
        }
    }

    /// Identity cache of this pass.
    pub const fn identities(&self) -> &IdentityCache {
        &self.identities
    }

    /// Stop iterating and return the reader.
    pub fn into_reader(self) -> R {
        self.reader
    }
}

impl<T: Entity, R: RowReader> Iterator for Rows<T, R> {
    type Item = Result<T, MaterializeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.reader.read() {
            Ok(false) => {
                self.done = true;
                return None;
            }
            Ok(true) => self
                .materializer
                .materialize_selection(&self.selection, &self.reader, &mut self.identities),
            Err(e) => Err(e.into())
        };
        self.done = item.is_err();
        Some(item)
    }
}

impl<T: Entity, R: RowReader> FusedIterator for Rows<T, R> {}

impl<T, R> fmt::Debug for Rows<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("identities", &self.identities)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

/// Iterator over rows materialized as [`DynamicRecord`]s rooted at `E`.
pub struct DynamicRows<E, R> {
    materializer: Materializer,
    reader:       R,
    selection:    AttributeSelection<E>,
    done:         bool
}

impl<E: Entity, R: RowReader> DynamicRows<E, R> {
    pub(super) fn new(materializer: Materializer, reader: R, selection: AttributeSelection<E>) -> Self {
        Self {
            materializer,
            reader,
            selection,
            done: false
        }
    }
}

impl<E: Entity, R: RowReader> Iterator for DynamicRows<E, R> {
    type Item = Result<DynamicRecord, MaterializeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.reader.read() {
            Ok(false) => {
                self.done = true;
                return None;
            }
            Ok(true) => self
                .materializer
                .materialize_dynamic(&self.selection, &self.reader),
            Err(e) => Err(e.into())
        };
        self.done = item.is_err();
        Some(item)
    }
}

impl<E: Entity, R: RowReader> FusedIterator for DynamicRows<E, R> {}

impl<E, R> fmt::Debug for DynamicRows<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicRows")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
