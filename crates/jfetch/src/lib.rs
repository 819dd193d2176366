//! # jfetch
//!
//! Dynamic JSON values with jq-like path queries, and marshalling helpers with
//! conventional field naming.
//!
//! ## Querying
//!
//! ```rust
//! let j = jfetch::parse(r#"{
//!     "name": "Jason",
//!     "category": {"name": "dogs"},
//!     "tags": [{"name": "briard"}]
//! }"#);
//!
//! assert_eq!(j.q(".name").to_string(), "Jason");
//! assert_eq!(j.q(".category.name").to_string(), "dogs");
//! assert_eq!(j.q(".tags[0].name").to_string(), "briard");
//!
//! // Paths that do not resolve yield `Nil` and can be chained further
//! assert!(j.q(".owner").q(".name").is_nil());
//! ```
//!
//! ## Marshalling
//!
//! Field names start with a lower-case letter and zero values are omitted, unless the field
//! has an explicit name.
//!
//! ```rust
//! use jfetch::{marshal, unmarshal, Marshal, Unmarshal};
//!
//! #[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
//! #[allow(non_snake_case)]
//! struct Pet {
//!     Name: String,
//!     Tag: String,
//!     #[json(name = "ID")]
//!     id: u64,
//! }
//!
//! let pet = Pet { Name: "Lola".to_string(), ..Pet::default() };
//! let json = marshal(&pet)?;
//! assert_eq!(json, r#"{"name":"Lola","ID":0}"#);
//! assert_eq!(unmarshal::<Pet>(&json)?, pet);
//! # Ok::<(), jfetch::Error>(())
//! ```
extern crate self as jfetch;

mod codec;
mod error;
mod query;
mod respond;
mod value;
mod zero;

pub use codec::{marshal, parse, unmarshal, unmarshal_into, unmarshal_j};
pub use error::Error;
pub use jfetch_codegen::{Marshal, Unmarshal};
pub use query::QueryError;
pub use respond::{
    handler, ErrorFormat, Handler, HttpError, Reply, Request, RespondOptions, Response,
    CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT, DEFAULT_ERROR_FORMAT,
};
pub use value::J;
pub use zero::Zero;

use serde::{Deserialize, Serialize};

/// A body that is never read or written.
///
/// As an [`unmarshal`] target it ignores the input; as a response body it renders nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Empty;

#[doc(hidden)]
pub mod __private {
    pub use crate::codec::match_field;
    pub use serde;
}
