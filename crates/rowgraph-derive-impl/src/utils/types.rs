// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type shape helpers.

use syn::{GenericArgument, PathArguments, Type};

/// Inner `T` of `Option<Arc<T>>`.
///
/// Accepts any path ending in `Option` and `Arc`, so `std::sync::Arc<T>`
/// and `core::option::Option<..>` match as well.
pub fn option_arc_inner(ty: &Type) -> Option<&Type> {
    let arc = single_argument(ty, "Option")?;
    single_argument(arc, "Arc")
}

/// Single generic argument of `Name<T>`.
fn single_argument<'a>(ty: &'a Type, name: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != name {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None
    }
}

/// Last path segment of a type, for error messages.
pub fn type_label(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or_else(|| quote::quote!(#ty).to_string(), |s| s.ident.to_string()),
        _ => quote::quote!(#ty).to_string()
    }
}
