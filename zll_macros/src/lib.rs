// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod helpers;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(LinkedList)]
pub fn derive_linked_list(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    helpers::derive_link_enum_trait(input, "LinkedList", quote! {::zll::list::LinkedList})
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

#[proc_macro_derive(LinkElement)]
pub fn derive_link_element(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    helpers::derive_link_struct_trait(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

#[proc_macro_derive(SkewHeap)]
pub fn derive_skew_heap(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    helpers::derive_link_enum_trait(input, "SkewHeap", quote! {::zll::heap::SkewHeap})
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
