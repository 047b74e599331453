// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! - [`column`] — `#[column(name, alias, unique)]`
//! - [`relation`] — `#[relation(..)]` and `#[related(..)]`
//!
//! # Flags
//!
//! | Attribute | Attribute flag |
//! |-----------|----------------|
//! | `#[id]` | `PRIMARY_KEY` |
//! | `#[auto]` | `IDENTITY_COLUMN` |
//! | `#[column(unique)]` | `UNIQUE_KEY` |
//! | `#[mapped]` | `MAPPED_ATTRIBUTE` |

mod column;
mod relation;

pub use column::ColumnConfig;
use convert_case::{Case, Casing};
pub use relation::{RelatedConfig, RelationConfig};
use syn::{Attribute, Field, Ident, Meta, Type};

use crate::utils::{docs::extract_doc_summary, types::option_arc_inner};

/// Role of a field in the entity graph.
#[derive(Debug)]
pub enum FieldKind {
    /// Column of the declaring entity.
    Scalar,

    /// Column of a joined entity stored on the declaring type.
    Related(RelatedConfig),

    /// Nested `Option<Arc<T>>` object.
    Relation(RelationConfig)
}

/// Field definition with all parsed attributes.
///
/// # Example
///
/// ```rust,ignore
/// #[id]                           // is_id = true
/// #[auto]                         // is_auto = true
/// pub id: i64,
///
/// #[relation(alias = "CreatedBy")] // kind = Relation
/// pub created_by: Option<Arc<User>>,
/// ```
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident: Ident,

    /// Field type.
    pub ty: Type,

    /// Primary key (`#[id]`).
    pub is_id: bool,

    /// Database-generated (`#[auto]`).
    pub is_auto: bool,

    /// Metadata-only (`#[mapped]`).
    pub is_mapped: bool,

    /// Excluded from mapping (`#[field(skip)]`).
    pub skip: bool,

    /// Column configuration.
    pub column: ColumnConfig,

    /// Scalar, related or relation.
    pub kind: FieldKind,

    /// First line of the field's doc comment.
    pub doc: Option<String>
}

impl FieldDef {
    /// Parse field definition from syn's `Field`.
    ///
    /// # Errors
    ///
    /// - Unnamed field
    /// - Malformed attribute arguments
    /// - `#[relation]` on a field not typed `Option<Arc<T>>`
    /// - `#[relation]` combined with `#[related]`, `#[id]`, `#[auto]`,
    ///   `#[mapped]` or `#[column]`
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;

        let mut is_id = false;
        let mut is_auto = false;
        let mut is_mapped = false;
        let mut skip = false;
        let mut column: Option<ColumnConfig> = None;
        let mut related: Option<RelatedConfig> = None;
        let mut relation: Option<Option<String>> = None;

        for attr in &field.attrs {
            if attr.path().is_ident("id") {
                is_id = true;
            } else if attr.path().is_ident("auto") {
                is_auto = true;
            } else if attr.path().is_ident("mapped") {
                is_mapped = true;
            } else if attr.path().is_ident("field") {
                skip = parse_skip(attr)?;
            } else if attr.path().is_ident("column") {
                column = Some(ColumnConfig::from_attr(attr)?);
            } else if attr.path().is_ident("related") {
                related = Some(RelatedConfig::from_attr(attr)?);
            } else if attr.path().is_ident("relation") {
                relation = Some(relation::parse_relation_alias(attr)?);
            }
        }

        let kind = match (relation, related) {
            (Some(_), Some(_)) => {
                return Err(darling::Error::custom(
                    "#[relation] and #[related] cannot be combined"
                )
                .with_span(&ident));
            }
            (Some(alias), None) => {
                if is_id || is_auto || is_mapped || column.is_some() {
                    return Err(darling::Error::custom(
                        "#[relation] cannot be combined with #[id], #[auto], #[mapped] or #[column]"
                    )
                    .with_span(&ident));
                }
                let target = option_arc_inner(&field.ty).cloned().ok_or_else(|| {
                    darling::Error::custom("#[relation] fields must be `Option<Arc<T>>`")
                        .with_span(&field.ty)
                })?;
                FieldKind::Relation(RelationConfig {
                    alias: alias.unwrap_or_else(|| ident.to_string().to_case(Case::Pascal)),
                    target
                })
            }
            (None, Some(related)) => FieldKind::Related(related),
            (None, None) => FieldKind::Scalar
        };

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            is_id,
            is_auto,
            is_mapped,
            skip,
            column: column.unwrap_or_default(),
            kind,
            doc: extract_doc_summary(&field.attrs)
        })
    }

    /// Field name as a string.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Name of the generated property constant (`created_by` → `CREATED_BY`).
    #[must_use]
    pub fn const_name(&self) -> Ident {
        Ident::new(&self.name_str().to_case(Case::Constant), self.ident.span())
    }

    /// Physical column override.
    ///
    /// `#[related(.., column = "..")]` names a column of the joined entity;
    /// otherwise `#[column(name = "..")]`.
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Related(related) => related.column.as_deref().or(self.column.name.as_deref()),
            _ => self.column.name.as_deref()
        }
    }

    /// Check if this field is a nested relation.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::Relation(_))
    }
}

fn parse_skip(attr: &Attribute) -> darling::Result<bool> {
    let mut skip = false;
    if let Meta::List(list) = &attr.meta {
        list.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

#[cfg(test)]
mod tests {
    use syn::{Field, parse_quote};

    use super::*;

    fn parse(field: Field) -> darling::Result<FieldDef> {
        FieldDef::from_field(&field)
    }

    #[test]
    fn plain_field_is_scalar() {
        let def = parse(parse_quote! { pub name: String }).unwrap();
        assert!(matches!(def.kind, FieldKind::Scalar));
        assert!(!def.is_id && !def.is_auto && !def.is_mapped && !def.skip);
        assert_eq!(def.const_name().to_string(), "NAME");
        assert!(def.column_name().is_none());
    }

    #[test]
    fn key_markers() {
        let def = parse(parse_quote! {
            #[id]
            #[auto]
            pub id: i64
        })
        .unwrap();
        assert!(def.is_id);
        assert!(def.is_auto);
    }

    #[test]
    fn column_overrides() {
        let def = parse(parse_quote! {
            #[column(name = "Name", alias = "FieldName", unique)]
            pub name: String
        })
        .unwrap();
        assert_eq!(def.column_name(), Some("Name"));
        assert_eq!(def.column.alias.as_deref(), Some("FieldName"));
        assert!(def.column.unique);
    }

    #[test]
    fn relation_default_alias_is_upper_camel() {
        let def = parse(parse_quote! {
            #[relation]
            pub created_by: Option<Arc<User>>
        })
        .unwrap();
        let FieldKind::Relation(relation) = &def.kind else {
            panic!("expected relation");
        };
        assert_eq!(relation.alias, "CreatedBy");
        assert_eq!(def.const_name().to_string(), "CREATED_BY");
        assert!(def.is_relation());
    }

    #[test]
    fn relation_explicit_alias() {
        let def = parse(parse_quote! {
            #[relation(alias = "Author")]
            pub created_by: Option<std::sync::Arc<User>>
        })
        .unwrap();
        let FieldKind::Relation(relation) = &def.kind else {
            panic!("expected relation");
        };
        assert_eq!(relation.alias, "Author");
    }

    #[test]
    fn related_column() {
        let def = parse(parse_quote! {
            #[related(User, alias = "Owner", column = "first_name")]
            pub owner_name: Option<String>
        })
        .unwrap();
        assert_eq!(def.column_name(), Some("first_name"));
        let FieldKind::Related(related) = &def.kind else {
            panic!("expected related");
        };
        assert_eq!(related.alias.as_deref(), Some("Owner"));
    }

    #[test]
    fn relation_requires_option_arc() {
        let err = parse(parse_quote! {
            #[relation]
            pub created_by: User
        })
        .unwrap_err();
        assert!(err.to_string().contains("Option<Arc<T>>"));
    }

    #[test]
    fn relation_rejects_key_markers() {
        assert!(
            parse(parse_quote! {
                #[id]
                #[relation]
                pub created_by: Option<Arc<User>>
            })
            .is_err()
        );
    }

    #[test]
    fn relation_and_related_conflict() {
        assert!(
            parse(parse_quote! {
                #[relation]
                #[related(User)]
                pub created_by: Option<Arc<User>>
            })
            .is_err()
        );
    }

    #[test]
    fn doc_summary_is_kept() {
        let def = parse(parse_quote! {
            /// Display name.
            ///
            /// Shown in lists.
            pub name: String
        })
        .unwrap();
        assert_eq!(def.doc.as_deref(), Some("Display name."));
    }

    #[test]
    fn skip_and_mapped() {
        let skipped = parse(parse_quote! {
            #[field(skip)]
            pub cache: Vec<u8>
        })
        .unwrap();
        assert!(skipped.skip);

        let mapped = parse(parse_quote! {
            #[mapped]
            pub revision: i32
        })
        .unwrap();
        assert!(mapped.is_mapped);
    }

    #[test]
    fn unknown_field_option_fails() {
        assert!(
            parse(parse_quote! {
                #[field(create)]
                pub name: String
            })
            .is_err()
        );
    }
}
