//! Marshalling entry points.
//!
//! Structs opt into the naming conventions with `#[derive(Marshal, Unmarshal)]`: field names
//! start with a lower-case letter and zero values are skipped unless the field carries an
//! explicit `#[json(name = "...")]`.
use std::any::{Any, TypeId};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{Empty, Error, J};

/// Serializes `value` to compact JSON.
///
/// # Errors
///
/// Fails if `value` cannot be represented as JSON, e.g. a map with non-string keys or a
/// `J::Error`.
pub fn marshal<T>(value: &T) -> Result<String, Error>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(Error::encode)
}

/// Deserializes `text` into `T`.
///
/// A few targets bypass JSON decoding:
///
/// - `String` receives `text` verbatim, which must not be empty;
/// - `Vec<u8>` receives the bytes of `text` verbatim;
/// - [`Empty`] ignores `text` entirely;
/// - [`J`] accepts any JSON document except a bare `null`.
///
/// ```rust
/// use jfetch::{unmarshal, J};
///
/// let text: String = unmarshal("plain text")?;
/// assert_eq!(text, "plain text");
///
/// let j: J = unmarshal(r#"{"tags":["a","b"]}"#)?;
/// assert_eq!(j.q(".tags[1]").as_str(), Some("b"));
///
/// let numbers: Vec<u32> = unmarshal("[1, 2]")?;
/// assert_eq!(numbers, [1, 2]);
/// # Ok::<(), jfetch::Error>(())
/// ```
///
/// # Errors
///
/// Fails on malformed JSON, on JSON that does not match the shape of `T`, on an empty
/// `String` target and on a `null` document for a `J` target.
pub fn unmarshal<T>(text: &str) -> Result<T, Error>
where
    T: DeserializeOwned + 'static,
{
    if let Some(result) = pass_through::<T>(text) {
        return result;
    }
    serde_json::from_str(text).map_err(|error| {
        tracing::debug!(
            target_type = std::any::type_name::<T>(),
            %error,
            "Failed to unmarshal"
        );
        Error::decode(error)
    })
}

/// Deserializes `text` into an existing `target`.
///
/// `target` is left untouched on failure.
///
/// # Errors
///
/// See [`unmarshal`].
pub fn unmarshal_into<T>(text: &str, target: &mut T) -> Result<(), Error>
where
    T: DeserializeOwned + 'static,
{
    *target = unmarshal(text)?;
    Ok(())
}

/// Deserializes the textual form of `value` into `T`.
///
/// # Errors
///
/// Fails for `J::Nil` and `J::Error`, and otherwise as [`unmarshal`] does.
pub fn unmarshal_j<T>(value: &J) -> Result<T, Error>
where
    T: DeserializeOwned + 'static,
{
    match value {
        J::Nil => Err(Error::NilValue),
        J::Error(error) => Err(Error::Query(error.clone())),
        _ => unmarshal(&value.to_string()),
    }
}

/// Parses `text` into a [`J`], returning `J::Nil` when it is not valid JSON.
///
/// ```rust
/// use jfetch::parse;
///
/// assert_eq!(parse(r#"{"id":7}"#).q(".id").as_number(), Some(7.0));
/// assert!(parse("{oops").is_nil());
/// ```
#[must_use]
pub fn parse(text: &str) -> J {
    unmarshal::<J>(text).unwrap_or(J::Nil)
}

fn pass_through<T: 'static>(text: &str) -> Option<Result<T, Error>> {
    let target = TypeId::of::<T>();
    let value: Box<dyn Any> = if target == TypeId::of::<String>() {
        if text.is_empty() {
            return Some(Err(Error::EmptyBody));
        }
        Box::new(text.to_string())
    } else if target == TypeId::of::<Vec<u8>>() {
        Box::new(text.as_bytes().to_vec())
    } else if target == TypeId::of::<Empty>() {
        Box::new(Empty)
    } else if target == TypeId::of::<J>() {
        match parse_root(text) {
            Ok(value) => Box::new(value),
            Err(error) => return Some(Err(error)),
        }
    } else {
        return None;
    };
    value.downcast::<T>().ok().map(|value| Ok(*value))
}

fn parse_root(text: &str) -> Result<J, Error> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => Err(Error::NullRoot),
        Ok(value) => Ok(J::from(value)),
        Err(error) => {
            tracing::debug!(%error, "Failed to parse JSON document");
            Err(Error::decode(error))
        }
    }
}

/// Index of the field named `key`: exact matches win over case-insensitive ones.
#[doc(hidden)]
#[must_use]
pub fn match_field(key: &str, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .position(|name| *name == key)
        .or_else(|| names.iter().position(|name| eq_ignore_case(name, key)))
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
