use std::{fmt, str::FromStr};

use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::{Error, QueryError};

/// Largest magnitude at which every integral `f64` is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Arbitrary JSON.
///
/// Depending on the JSON data type, a queried `J` is one of these variants:
///
/// | Variant     | Payload                 | JSON data type                       |
/// |-------------|-------------------------|--------------------------------------|
/// | `Object`    | `Map<String, Value>`    | object                               |
/// | `Array`     | `Vec<Value>`            | array                                |
/// | `Number`    | `f64`                   | number                               |
/// | `String`    | `String`                | string                               |
/// | `Bool`      | `bool`                  | boolean                              |
/// | `Nil`       |                         | null, or anything not found          |
/// | `Error`     | [`QueryError`]          | not JSON: the path pattern was malformed |
///
/// Nested values of objects and arrays are kept as raw [`serde_json::Value`]s and are
/// converted on access. Their numbers are stored in the same `f64` form as `Number`.
///
/// ```rust
/// use jfetch::J;
///
/// let j: J = r#"{"name":"Jason","tags":[{"name":"briard"}]}"#.parse()?;
/// assert_eq!(j.q(".name").as_str(), Some("Jason"));
/// assert_eq!(j.q(".tags[0].name").to_string(), "briard");
/// assert!(j.q(".owner.name").is_nil());
/// # Ok::<(), jfetch::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum J {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Number(f64),
    String(String),
    Bool(bool),
    #[default]
    Nil,
    Error(QueryError),
}

impl J {
    /// Converts the value into its raw representation.
    ///
    /// `Nil` and `Error` become [`Value::Null`].
    #[must_use]
    pub fn raw(&self) -> Value {
        self.clone().into_raw()
    }

    /// Consumes the value and returns its raw representation.
    #[must_use]
    pub fn into_raw(self) -> Value {
        match self {
            J::Object(map) => Value::Object(map),
            J::Array(items) => Value::Array(items),
            J::Number(number) => number_to_value(number),
            J::String(string) => Value::String(string),
            J::Bool(boolean) => Value::Bool(boolean),
            J::Nil | J::Error(_) => Value::Null,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            J::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            J::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            J::Number(number) => Some(*number),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            J::String(string) => Some(string),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            J::Bool(boolean) => Some(*boolean),
            _ => None,
        }
    }

    /// Whether the value is `Nil`, i.e. JSON `null` or a path that did not resolve.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, J::Nil)
    }

    /// Whether the value is the result of querying with a malformed pattern.
    #[must_use]
    pub fn is_query_error(&self) -> bool {
        matches!(self, J::Error(_))
    }

    #[must_use]
    pub fn query_error(&self) -> Option<&QueryError> {
        match self {
            J::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// JSON numbers are `f64` here, but integral values are written without a fraction.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn number_to_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        if number >= 0.0 {
            Value::from(number as u64)
        } else {
            Value::from(number as i64)
        }
    } else {
        serde_json::Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

impl From<Value> for J {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => J::Nil,
            Value::Bool(boolean) => J::Bool(boolean),
            Value::Number(number) => J::Number(number_to_f64(&number)),
            Value::String(string) => J::String(string),
            Value::Array(items) => J::from(items),
            Value::Object(map) => J::from(map),
        }
    }
}

fn number_to_f64(number: &Number) -> f64 {
    match number.as_f64() {
        Some(number) => number,
        None => panic!("JSON number {number} is not representable as f64"),
    }
}

/// Rewrites every nested number into its `f64` form.
fn normalize(value: Value) -> Value {
    match value {
        Value::Number(number) => number_to_value(number_to_f64(&number)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize(value)))
                .collect(),
        ),
        other => other,
    }
}

impl From<&Value> for J {
    fn from(value: &Value) -> Self {
        J::from(value.clone())
    }
}

impl From<J> for Value {
    fn from(value: J) -> Self {
        value.into_raw()
    }
}

impl From<Map<String, Value>> for J {
    fn from(map: Map<String, Value>) -> Self {
        J::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize(value)))
                .collect(),
        )
    }
}

impl From<Vec<Value>> for J {
    fn from(items: Vec<Value>) -> Self {
        J::Array(items.into_iter().map(normalize).collect())
    }
}

impl From<f64> for J {
    fn from(number: f64) -> Self {
        J::Number(number)
    }
}

impl From<String> for J {
    fn from(string: String) -> Self {
        J::String(string)
    }
}

impl From<&str> for J {
    fn from(string: &str) -> Self {
        J::String(string.to_string())
    }
}

impl From<bool> for J {
    fn from(boolean: bool) -> Self {
        J::Bool(boolean)
    }
}

impl From<QueryError> for J {
    fn from(error: QueryError) -> Self {
        J::Error(error)
    }
}

impl fmt::Display for J {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            J::Object(_) | J::Array(_) => match crate::marshal(self) {
                Ok(json) => f.write_str(&json),
                Err(error) => write!(f, "{error}"),
            },
            J::Number(number) => write!(f, "{number}"),
            J::String(string) => f.write_str(string),
            J::Bool(boolean) => write!(f, "{boolean}"),
            J::Nil => f.write_str("nil"),
            J::Error(error) => write!(f, "query error: {error}"),
        }
    }
}

impl FromStr for J {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::unmarshal(s)
    }
}

impl Serialize for J {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            J::Object(map) => map.serialize(serializer),
            J::Array(items) => items.serialize(serializer),
            J::Number(number) => number_to_value(*number).serialize(serializer),
            J::String(string) => serializer.serialize_str(string),
            J::Bool(boolean) => serializer.serialize_bool(*boolean),
            J::Nil => serializer.serialize_unit(),
            J::Error(error) => Err(ser::Error::custom(format_args!(
                "cannot serialize query error: {error}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for J {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(J::from)
    }
}
