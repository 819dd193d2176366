use std::collections::HashSet;

use proc_macro2::{Span, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;
use syn::{ext::IdentExt, Data, DeriveInput, Fields, Ident, LitStr, Type};

use crate::naming::lower_first;

/// A struct field together with its marshalling rules.
pub(crate) struct Field<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) ty: &'a Type,
    /// Output key.
    pub(crate) key: String,
    /// Whether the field is skipped while holding a zero value.
    pub(crate) omit_empty: bool,
    pub(crate) skip: bool,
}

pub(crate) struct Container<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) fields: Vec<Field<'a>>,
    pub(crate) is_unit: bool,
}

impl<'a> Container<'a> {
    pub(crate) fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Only structs with named fields are supported",
            ));
        };
        let named = match &data.fields {
            Fields::Named(named) => named,
            Fields::Unit => {
                return Ok(Container {
                    ident: &input.ident,
                    fields: Vec::new(),
                    is_unit: true,
                })
            }
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new_spanned(
                    unnamed,
                    "Tuple structs are not supported, use named fields",
                ))
            }
        };
        let mut fields = Vec::with_capacity(named.named.len());
        let mut seen = HashSet::new();
        for field in &named.named {
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let field = parse_field(ident, &field.ty, &field.attrs)?;
            if !field.skip && !seen.insert(field.key.clone()) {
                return Err(syn::Error::new_spanned(
                    ident,
                    format!("Duplicate JSON key `{}`", field.key),
                ));
            }
            fields.push(field);
        }
        Ok(Container {
            ident: &input.ident,
            fields,
            is_unit: false,
        })
    }

    /// Fields that take part in marshalling.
    pub(crate) fn emitted(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter().filter(|field| !field.skip)
    }

    pub(crate) fn skipped(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter().filter(|field| field.skip)
    }
}

fn parse_field<'a>(
    ident: &'a Ident,
    ty: &'a Type,
    attrs: &[syn::Attribute],
) -> syn::Result<Field<'a>> {
    let mut name: Option<LitStr> = None;
    let mut omit_empty = false;
    let mut skip = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("json")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(syn::Error::new_spanned(value, "Name must not be empty"));
                }
                name = Some(value);
                Ok(())
            } else if meta.path.is_ident("omit_empty") {
                omit_empty = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("Expected `name`, `omit_empty` or `skip`"))
            }
        })?;
    }
    if skip && (name.is_some() || omit_empty) {
        return Err(syn::Error::new_spanned(
            ident,
            "`skip` cannot be combined with other options",
        ));
    }
    let (key, omit_empty) = match name {
        Some(name) => (name.value(), omit_empty),
        None => (lower_first(&ident.unraw().to_string()), true),
    };
    Ok(Field {
        ident,
        ty,
        key,
        omit_empty,
        skip,
    })
}

/// Path to the runtime crate as seen from the expansion site.
pub(crate) fn runtime_path() -> syn::Result<TokenStream> {
    match crate_name("jfetch") {
        Ok(FoundCrate::Itself) => Ok(quote!(::jfetch)),
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            Ok(quote!(::#ident))
        }
        Err(error) => Err(syn::Error::new(
            Span::call_site(),
            format!("`jfetch` is not a dependency: {error}"),
        )),
    }
}
