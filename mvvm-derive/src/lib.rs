mod event;
mod property_names;

use proc_macro::TokenStream;
use proc_macro2::Span;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

pub(crate) const CRATE_MVVM_CORE: &str = "mvvm-core";

#[proc_macro_derive(Event, attributes(event))]
pub fn event_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    event::expand(&ast).unwrap_or_else(|e| e.to_compile_error()).into()
}

#[proc_macro_derive(PropertyNames, attributes(property))]
pub fn property_names_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    property_names::expand(&ast).unwrap_or_else(|e| e.to_compile_error()).into()
}

/// Resolve `path` inside `mvvm-core`, wherever the caller imported it from.
/// `mvvm-core` names itself with `extern crate self as mvvm_core`.
pub(crate) fn with_crate(path: &str) -> syn::Result<proc_macro2::TokenStream> {
    let path: syn::Path = syn::parse_str(path)?;
    let found = crate_name(CRATE_MVVM_CORE)
        .map_err(|e| syn::Error::new(Span::call_site(), format!("{} not found: {}", CRATE_MVVM_CORE, e)))?;
    let stream = match found {
        FoundCrate::Itself => quote!(::mvvm_core::#path),
        FoundCrate::Name(name) => {
            let ident = format_ident!("{}", name);
            quote!(::#ident::#path)
        }
    };
    Ok(stream)
}
