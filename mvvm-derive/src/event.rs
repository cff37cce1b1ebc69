use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Lit, LitStr, Meta, NestedMeta};

use crate::with_crate;

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let event_trait = with_crate("event::Event")?;
    let name_fn = event_name(input)?.map(|name| {
        quote! {
            fn name() -> &'static str {
                #name
            }
        }
    });
    let stream = quote! {
        impl #impl_generics #event_trait for #ident #ty_generics #where_clause {
            #name_fn
        }
    };
    Ok(stream)
}

fn event_name(input: &DeriveInput) -> syn::Result<Option<LitStr>> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|a| a.path.is_ident("event")) {
        let list = match attr.parse_meta()? {
            Meta::List(list) => list,
            other => return Err(syn::Error::new_spanned(other, "expected #[event(name = \"...\")]")),
        };
        for nested in list.nested {
            match nested {
                NestedMeta::Meta(Meta::NameValue(value)) if value.path.is_ident("name") => {
                    match value.lit {
                        Lit::Str(lit) => name = Some(lit),
                        other => return Err(syn::Error::new_spanned(other, "event name must be a string literal")),
                    }
                }
                other => return Err(syn::Error::new_spanned(other, "unknown event attribute, expected name = \"...\"")),
            }
        }
    }
    Ok(name)
}
