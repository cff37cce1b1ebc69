use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DataStruct, DeriveInput, Field, Fields, Meta, NestedMeta};

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = match &input.data {
        Data::Struct(DataStruct { fields: Fields::Named(named), .. }) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(ident, "PropertyNames can only be derived for structs with named fields"));
        }
    };
    let mut names = vec![];
    for field in fields {
        if is_skipped(field)? {
            continue;
        }
        if let Some(field_ident) = &field.ident {
            let name = field_ident.to_string().trim_start_matches("r#").to_string();
            names.push(name);
        }
    }
    let constants = names.iter().map(|name| {
        let constant = format_ident!("PROP_{}", name.to_uppercase());
        quote! {
            pub const #constant: &'static str = #name;
        }
    });
    let stream = quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#constants)*

            pub const PROPERTIES: &'static [&'static str] = &[#(#names),*];
        }
    };
    Ok(stream)
}

fn is_skipped(field: &Field) -> syn::Result<bool> {
    for attr in field.attrs.iter().filter(|a| a.path.is_ident("property")) {
        let list = match attr.parse_meta()? {
            Meta::List(list) => list,
            other => return Err(syn::Error::new_spanned(other, "expected #[property(skip)]")),
        };
        for nested in list.nested {
            match nested {
                NestedMeta::Meta(Meta::Path(path)) if path.is_ident("skip") => return Ok(true),
                other => return Err(syn::Error::new_spanned(other, "unknown property attribute, expected skip")),
            }
        }
    }
    Ok(false)
}
