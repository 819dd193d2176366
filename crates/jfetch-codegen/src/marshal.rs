use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, DeriveInput, GenericParam, Generics, TypeParamBound};

use crate::container::{runtime_path, Container};

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = Container::from_input(input)?;
    let jfetch = runtime_path()?;
    let name = container.ident;
    let struct_name = name.to_string();

    let generics = with_bounds(
        &input.generics,
        &[
            parse_quote!(#jfetch::__private::serde::Serialize),
            parse_quote!(#jfetch::Zero),
        ],
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut lengths = Vec::new();
    let mut writes = Vec::new();
    let mut zero_checks = Vec::new();
    for field in container.emitted() {
        let ident = field.ident;
        let key = &field.key;
        if field.omit_empty {
            lengths.push(quote! {
                usize::from(!#jfetch::Zero::is_zero(&self.#ident))
            });
            writes.push(quote! {
                if #jfetch::Zero::is_zero(&self.#ident) {
                    state.skip_field(#key)?;
                } else {
                    state.serialize_field(#key, &self.#ident)?;
                }
            });
        } else {
            lengths.push(quote!(1usize));
            writes.push(quote! {
                state.serialize_field(#key, &self.#ident)?;
            });
        }
        zero_checks.push(quote!(#jfetch::Zero::is_zero(&self.#ident)));
    }

    Ok(quote! {
        impl #impl_generics #jfetch::__private::serde::Serialize for #name #ty_generics #where_clause {
            fn serialize<__S>(&self, serializer: __S) -> ::core::result::Result<__S::Ok, __S::Error>
            where
                __S: #jfetch::__private::serde::Serializer,
            {
                use #jfetch::__private::serde::ser::SerializeStruct as _;

                let len = 0usize #(+ #lengths)*;
                #[allow(unused_mut)]
                let mut state = serializer.serialize_struct(#struct_name, len)?;
                #(#writes)*
                state.end()
            }
        }

        impl #impl_generics #jfetch::Zero for #name #ty_generics #where_clause {
            fn is_zero(&self) -> bool {
                true #(&& #zero_checks)*
            }
        }
    })
}

/// Adds `bounds` to every type parameter.
pub(crate) fn with_bounds(generics: &Generics, bounds: &[TypeParamBound]) -> Generics {
    let mut generics = generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(param) = param {
            param.bounds.extend(bounds.iter().cloned());
        }
    }
    generics
}
