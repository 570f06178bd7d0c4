// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, GenericArgument, Ident, PathArguments, Result, Type,
};

/// Helper function to derive the trait that designates an empty enum as a linked structure.
///
/// Example parameters for the doubly linked list:
/// * kind_name: "LinkedList"
/// * kind_path: quote! {::zll::list::LinkedList}
pub(crate) fn derive_link_enum_trait(
    input: DeriveInput,
    kind_name: &str,
    kind_path: TokenStream,
) -> Result<TokenStream> {
    if let Data::Enum(e) = &input.data {
        if e.variants.is_empty() {
            let ident = &input.ident;

            return Ok(quote! {
                impl ::zll::TypedLink for #ident {
                    type T = #kind_path;
                }
            });
        }
    }

    Err(Error::new_spanned(
        input,
        format!("{} can only be derived for an empty enum", kind_name),
    ))
}

/// Helper function to derive LinkElement.
pub(crate) fn derive_link_struct_trait(input: DeriveInput) -> Result<TokenStream> {
    let s = match &input.data {
        Data::Struct(s) => s,
        _ => {
            return Err(Error::new_spanned(
                input,
                "LinkElement can only be derived for structs",
            ))
        }
    };

    let f = match &s.fields {
        Fields::Named(f) => f,
        _ => {
            return Err(Error::new_spanned(
                input,
                "LinkElement can only be derived for structs with named fields",
            ))
        }
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let tokens = f.named.iter().filter_map(|field| {
        parse_element_field(field).map(|info| {
            let field_ident = info.ident;
            let link_ty = info.link_ty;

            quote! {
                unsafe impl #impl_generics ::zll::LinkElement<#link_ty> for #ident #ty_generics #where_clause {
                    fn offset() -> usize {
                        let base = ::core::mem::MaybeUninit::<Self>::uninit();
                        let base_ptr = base.as_ptr();
                        let field_ptr = unsafe { ::core::ptr::addr_of!((*base_ptr).#field_ident) };
                        field_ptr as usize - base_ptr as usize
                    }
                }
            }
        })
    });
    let output = quote! {
        #(#tokens)*
    };

    if output.is_empty() {
        return Err(Error::new_spanned(
            input,
            "Found no LlHeader/ShHeader fields",
        ));
    }

    Ok(output)
}

pub(crate) struct ElementFieldInfo<'a> {
    /// The "entry" in `entry: zll::list::LlHeader<Self, mytraits::MyList>`
    pub(crate) ident: &'a Ident,
    /// The "mytraits::MyList" in `entry: zll::list::LlHeader<Self, mytraits::MyList>`
    pub(crate) link_ty: &'a Type,
}

/// Checks if the given field is a header field of an element structure and returns some
/// information about it.
///
/// `field` can be the syntax tree of e.g.
/// * `entry: LlHeader<Self, MyList>`
/// * `entry: zll::list::LlHeader<Self, mytraits::MyList>`
/// * `entry: ShHeader<Self, MyHeap, ByPriority>`
pub(crate) fn parse_element_field(field: &Field) -> Option<ElementFieldInfo<'_>> {
    // (type name, minimum number of type arguments, maximum number of type arguments)
    const SUPPORTED_TYPES: &[(&str, usize, usize)] = &[("LlHeader", 2, 2), ("ShHeader", 2, 3)];

    let ident = field.ident.as_ref()?;

    // Get the last segment of the type path and check it against the type name.
    // This isn't 100% accurate, we may catch similarly named types that are not ours.
    // But a user who derives `LinkElement` for a structure shouldn't mix it with foreign `LlHeader` types anyway...
    let ty_path = match &field.ty {
        Type::Path(ty_path) => ty_path,
        _ => return None,
    };

    let segment = ty_path.path.segments.last()?;
    let (_, min_args, max_args) = SUPPORTED_TYPES
        .iter()
        .find(|(name, _, _)| segment.ident == name)?;

    // Make our check more accurate by also checking the number of type parameters.
    let ab_args = match &segment.arguments {
        PathArguments::AngleBracketed(ab_args) => ab_args,
        _ => return None,
    };
    if ab_args.args.len() < *min_args || ab_args.args.len() > *max_args {
        return None;
    }

    // Now we can be reasonably sure that this is one of our header types and the second type
    // parameter is the structure marker we are looking for.
    let arg = ab_args.args.iter().nth(1)?;
    let link_ty = match arg {
        GenericArgument::Type(ty) => ty,
        _ => return None,
    };

    Some(ElementFieldInfo { ident, link_ty })
}
