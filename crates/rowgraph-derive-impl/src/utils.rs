// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared utilities for code generation.
//!
//! # Submodules
//!
//! - [`docs`] — Doc comment extraction for generated property constants
//! - [`types`] — Type shape inspection (`Option<Arc<T>>`)

pub mod docs;
pub mod types;
