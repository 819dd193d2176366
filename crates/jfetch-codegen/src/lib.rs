//! Derive macros implementing the jfetch marshalling conventions.
//!
//! Use them through the `jfetch` crate, which re-exports both.
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod container;
mod marshal;
mod naming;
mod unmarshal;

/// Derives `serde::Serialize` and `jfetch::Zero` for a struct with named fields.
///
/// Every field is written under its name with the first letter lower-cased, and omitted
/// while it holds a zero value. Field attributes change that:
///
/// - `#[json(name = "Key")]` writes the field under `Key` verbatim, even when it is zero;
/// - `#[json(name = "Key", omit_empty)]` uses `Key` but still omits zero values;
/// - `#[json(skip)]` never writes the field.
///
/// ```ignore
/// #[derive(jfetch::Marshal)]
/// struct Pet {
///     Name: String,       // "name", omitted when empty
///     #[json(name = "Tag")]
///     tag: String,        // "Tag", always present
/// }
/// ```
#[proc_macro_derive(Marshal, attributes(json))]
pub fn derive_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match marshal::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derives `serde::Deserialize` for a struct with named fields.
///
/// Keys are matched against the same names `Marshal` writes: exact matches first, then
/// case-insensitively. Unknown keys are ignored and missing fields take their `Default`
/// value, so every field type must implement `Default`.
#[proc_macro_derive(Unmarshal, attributes(json))]
pub fn derive_unmarshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match unmarshal::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
