// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Doc comment extraction.
//!
//! Doc comments (`///`) are stored as `#[doc = "..."]` attributes. The first
//! line of a field's docs becomes the doc of its generated property
//! constant:
//!
//! ```rust,ignore
//! /// Display name.
//! pub name: String,
//!
//! // Generates:
//! /// Display name.
//! pub const NAME: Property<Field, String> = Property::new("name");
//! ```

use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// Extract doc comments from attributes.
///
/// Combines all `#[doc = "..."]` attributes into a single string,
/// trimming each line. Returns `None` when nothing but whitespace remains.
pub fn extract_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let doc_lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| {
            if let Meta::NameValue(meta) = &attr.meta
                && let Expr::Lit(ExprLit {
                    lit: Lit::Str(lit_str),
                    ..
                }) = &meta.value
            {
                return Some(lit_str.value());
            }
            None
        })
        .collect();

    let combined = doc_lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");

    let trimmed = combined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extract the first non-empty doc line.
pub fn extract_doc_summary(attrs: &[Attribute]) -> Option<String> {
    extract_doc_comments(attrs).and_then(|docs| {
        docs.lines()
            .find(|line| !line.trim().is_empty())
            .map(|s| s.trim().to_string())
    })
}
