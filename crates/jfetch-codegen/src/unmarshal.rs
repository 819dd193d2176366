use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{parse_quote, DeriveInput, GenericParam, Lifetime, LifetimeParam};

use crate::{
    container::{runtime_path, Container},
    marshal::with_bounds,
};

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = Container::from_input(input)?;
    let jfetch = runtime_path()?;
    let serde = quote!(#jfetch::__private::serde);
    let name = container.ident;
    let expecting = format!("struct {name}");

    let (visitor_impl_generics, visitor_ty_generics, visitor_where_clause) =
        input.generics.split_for_impl();

    let de = Lifetime::new("'de", Span::call_site());
    let mut generics = with_bounds(
        &input.generics,
        &[
            parse_quote!(#serde::Deserialize<#de>),
            parse_quote!(::core::default::Default),
        ],
    );
    generics
        .params
        .insert(0, GenericParam::Lifetime(LifetimeParam::new(de.clone())));
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let (_, ty_generics, _) = input.generics.split_for_impl();

    let emitted: Vec<_> = container.emitted().collect();
    let keys = emitted.iter().map(|field| field.key.as_str());
    let slots: Vec<_> = (0..emitted.len())
        .map(|idx| format_ident!("__field{}", idx))
        .collect();
    let declarations = emitted.iter().zip(&slots).map(|(field, slot)| {
        let ty = field.ty;
        quote! {
            let mut #slot: ::core::option::Option<#ty> = ::core::option::Option::None;
        }
    });
    let arms = slots.iter().enumerate().map(|(idx, slot)| {
        quote! {
            ::core::option::Option::Some(#idx) => {
                #slot = ::core::option::Option::Some(#serde::de::MapAccess::next_value(&mut map)?);
            }
        }
    });
    let (construct, construct_default) = if container.is_unit {
        (quote!(#name), quote!(#name))
    } else {
        let defaulted = container.fields.iter().map(|field| {
            let ident = field.ident;
            quote!(#ident: ::core::default::Default::default())
        });
        let construct_default = quote!(#name { #(#defaulted,)* });
        let assigned = emitted.iter().zip(&slots).map(|(field, slot)| {
            let ident = field.ident;
            quote!(#ident: #slot.unwrap_or_default())
        });
        let defaulted = container.skipped().map(|field| {
            let ident = field.ident;
            quote!(#ident: ::core::default::Default::default())
        });
        (
            quote!(#name { #(#assigned,)* #(#defaulted,)* }),
            construct_default,
        )
    };

    Ok(quote! {
        const _: () = {
            struct __Visitor #visitor_impl_generics #visitor_where_clause {
                marker: ::core::marker::PhantomData<fn() -> #name #visitor_ty_generics>,
            }

            impl #impl_generics #serde::de::Visitor<#de> for __Visitor #ty_generics #where_clause {
                type Value = #name #ty_generics;

                fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    formatter.write_str(#expecting)
                }

                fn visit_none<__E>(self) -> ::core::result::Result<Self::Value, __E>
                where
                    __E: #serde::de::Error,
                {
                    ::core::result::Result::Ok(#construct_default)
                }

                fn visit_unit<__E>(self) -> ::core::result::Result<Self::Value, __E>
                where
                    __E: #serde::de::Error,
                {
                    ::core::result::Result::Ok(#construct_default)
                }

                fn visit_some<__D>(self, deserializer: __D) -> ::core::result::Result<Self::Value, __D::Error>
                where
                    __D: #serde::Deserializer<#de>,
                {
                    #serde::Deserializer::deserialize_map(deserializer, self)
                }

                fn visit_map<__A>(self, mut map: __A) -> ::core::result::Result<Self::Value, __A::Error>
                where
                    __A: #serde::de::MapAccess<#de>,
                {
                    #(#declarations)*
                    while let ::core::option::Option::Some(key) =
                        #serde::de::MapAccess::next_key::<::std::string::String>(&mut map)?
                    {
                        match #jfetch::__private::match_field(&key, &[#(#keys),*]) {
                            #(#arms)*
                            _ => {
                                #serde::de::MapAccess::next_value::<#serde::de::IgnoredAny>(&mut map)?;
                            }
                        }
                    }
                    ::core::result::Result::Ok(#construct)
                }
            }

            impl #impl_generics #serde::Deserialize<#de> for #name #ty_generics #where_clause {
                fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
                where
                    __D: #serde::Deserializer<#de>,
                {
                    #serde::Deserializer::deserialize_option(
                        deserializer,
                        __Visitor {
                            marker: ::core::marker::PhantomData,
                        },
                    )
                }
            }
        };
    })
}
