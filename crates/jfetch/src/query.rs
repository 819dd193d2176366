//! jq-like path queries.
//!
//! A pattern is an optional leading `.` followed by object keys separated by `.` and
//! array indices in brackets: `.category.name`, `.tags[0].name`, `.[0][2]`.
//!
//! Malformed patterns produce a [`QueryError`]; well-formed paths that do not resolve
//! produce `J::Nil`.
use std::fmt;

use serde_json::{Map, Value};

use crate::J;

/// A syntax error in a path pattern.
///
/// It travels as the `J::Error` variant so chained queries short-circuit on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    message: String,
}

impl QueryError {
    fn new(message: String) -> Self {
        tracing::trace!(%message, "Malformed path pattern");
        Self { message }
    }

    fn unterminated_index() -> Self {
        Self::new("expected ] for array index".to_string())
    }

    fn invalid_index(text: &str) -> Self {
        Self::new(format!(
            "expected a number for array index, got: '{text}'"
        ))
    }

    fn missing_separator(text: &str) -> Self {
        Self::new(format!("expected . or [, got: '{text}'"))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for QueryError {}

impl J {
    /// Evaluates a jq-like `pattern` rooted at this value.
    ///
    /// ```rust
    /// use jfetch::J;
    ///
    /// let j: J = r#"{"name":"Jason","category":{"name":"dogs"},"tags":[{"name":"briard"}]}"#.parse()?;
    ///
    /// // The whole document
    /// assert_eq!(j.q("."), j);
    /// assert_eq!(j.q(".category.name").as_str(), Some("dogs"));
    /// assert_eq!(j.q(".category").q(".name").as_str(), Some("dogs"));
    /// assert_eq!(j.q(".tags[0].name").as_str(), Some("briard"));
    /// // Missing values are `Nil`, not errors
    /// assert!(j.q(".tags[5].name").is_nil());
    /// // Malformed patterns are errors
    /// assert!(j.q(".tags[first]").is_query_error());
    /// # Ok::<(), jfetch::Error>(())
    /// ```
    #[must_use]
    pub fn q(&self, pattern: &str) -> J {
        let step = match self {
            J::Object(map) => object(map, pattern),
            J::Array(items) => array(items, pattern),
            J::Number(_) | J::String(_) | J::Bool(_) => leaf(pattern),
            J::Nil => Step::Nil,
            J::Error(_) => Step::Itself,
        };
        match step {
            Step::Itself => self.clone(),
            Step::Found(value) => J::from(value),
            Step::Nil => J::Nil,
            Step::Error(error) => J::Error(error),
        }
    }
}

/// Outcome of evaluating a pattern against a borrowed node.
#[derive(Debug)]
enum Step<'a> {
    /// The pattern addresses the node it was evaluated against.
    Itself,
    Found(&'a Value),
    Nil,
    Error(QueryError),
}

impl<'a> Step<'a> {
    fn anchored(self, node: &'a Value) -> Step<'a> {
        match self {
            Step::Itself => Step::Found(node),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Dot,
    Bracket,
}

/// Position and kind of the earliest `.` or `[` in `pattern`.
fn next_separator(pattern: &str) -> Option<(usize, Separator)> {
    pattern.find(['.', '[']).map(|idx| {
        let separator = if pattern.as_bytes()[idx] == b'.' {
            Separator::Dot
        } else {
            Separator::Bracket
        };
        (idx, separator)
    })
}

fn before_separator(pattern: &str) -> &str {
    match next_separator(pattern) {
        Some((idx, _)) => &pattern[..idx],
        None => pattern,
    }
}

fn strip_dot(pattern: &str) -> &str {
    pattern.strip_prefix('.').unwrap_or(pattern)
}

fn leaf<'a>(pattern: &str) -> Step<'a> {
    if pattern.is_empty() || pattern == "." {
        Step::Itself
    } else {
        Step::Nil
    }
}

fn object<'a>(map: &'a Map<String, Value>, pattern: &str) -> Step<'a> {
    let pattern = strip_dot(pattern);
    if pattern.is_empty() {
        return Step::Itself;
    }
    match next_separator(pattern) {
        None => map.get(pattern).map_or(Step::Nil, Step::Found),
        Some((idx, separator)) => {
            let (key, remaining) = pattern.split_at(idx);
            match map.get(key) {
                Some(value) => descend(value, remaining, separator),
                None => Step::Nil,
            }
        }
    }
}

fn array<'a>(items: &'a [Value], pattern: &str) -> Step<'a> {
    let pattern = strip_dot(pattern);
    if pattern.is_empty() {
        return Step::Itself;
    }
    let Some(inner) = pattern.strip_prefix('[') else {
        // An object key against an array
        return Step::Nil;
    };
    let Some(close) = inner.find(']') else {
        return Step::Error(QueryError::unterminated_index());
    };
    let text = &inner[..close];
    let Ok(index) = text.parse::<i64>() else {
        return Step::Error(QueryError::invalid_index(text));
    };
    let Some(item) = usize::try_from(index).ok().and_then(|idx| items.get(idx)) else {
        return Step::Nil;
    };
    let remaining = &inner[close + 1..];
    if remaining.is_empty() {
        return Step::Found(item);
    }
    match next_separator(remaining) {
        Some((0, separator)) => descend(item, remaining, separator),
        _ => Step::Error(QueryError::missing_separator(before_separator(remaining))),
    }
}

/// Continues evaluation of `remaining` inside a nested value reached through `separator`.
fn descend<'a>(value: &'a Value, remaining: &str, separator: Separator) -> Step<'a> {
    match separator {
        Separator::Dot => resolve(value, remaining),
        Separator::Bracket => match value {
            Value::Array(items) => array(items, remaining).anchored(value),
            _ => Step::Nil,
        },
    }
}

fn resolve<'a>(value: &'a Value, pattern: &str) -> Step<'a> {
    let step = match value {
        Value::Object(map) => object(map, pattern),
        Value::Array(items) => array(items, pattern),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => leaf(pattern),
        Value::Null => Step::Nil,
    };
    step.anchored(value)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use test_case::test_case;

    use super::{next_separator, Separator};
    use crate::J;

    fn document(text: &str) -> J {
        crate::unmarshal(text).expect("Invalid test document")
    }

    #[test_case(r#"{"name": "Lola"}"#, ".name", json!("Lola"))]
    #[test_case(r#"{"name": "Lola"}"#, "name", json!("Lola"))]
    #[test_case(r#"{"dog": {"name": "Lola"}}"#, ".dog.name", json!("Lola"))]
    #[test_case(r#"{"pet": {"dog": {"name": "Lola"}}}"#, ".pet.dog.name", json!("Lola"))]
    #[test_case(r#"{"num": 1}"#, ".num", json!(1))]
    #[test_case("1", ".", json!(1))]
    #[test_case("[1, 2, 3]", ".[0]", json!(1))]
    #[test_case(r#"[{"name":"Lola"}, {"name":"Buster"}]"#, ".[1].name", json!("Buster"))]
    #[test_case(r#"{"nums":[1, 2, 57]}"#, ".nums[2]", json!(57))]
    #[test_case(r#"{"pets":[{"name":"Lola"}]}"#, ".pets[0].name", json!("Lola"))]
    #[test_case(
        r#"[{}, {"pets":[{},{}, {"name":"Lola", "tags":[{"id": 12}]}]}]"#,
        ".[1].pets[2].tags[0].id",
        json!(12)
    )]
    #[test_case(r#"{"":"hello"}"#, "..", json!("hello"))]
    #[test_case(r#"{"":{"name":"Lola"}}"#, "..name", json!("Lola"))]
    #[test_case("[[1, 2, 3]]", ".[0][2]", json!(3))]
    #[test_case("[[1, 2, 3]]", ".[0].[2]", json!(3))]
    #[test_case("[1, 2, 3]", ".[+1]", json!(2))]
    fn test_found(input: &str, pattern: &str, expected: Value) {
        assert_eq!(document(input).q(pattern).raw(), expected);
    }

    #[test_case("{}", ".name")]
    #[test_case("{}", ".name.category")]
    #[test_case("{}", ".name.tags[0]")]
    #[test_case("{}", ".[0]")]
    #[test_case("[]", ".name")]
    #[test_case("{}", "..")]
    #[test_case(r#"{"name":"Lola"}"#, ".name.category")]
    #[test_case(r#"{"name":"Lola"}"#, ".name[0]")]
    #[test_case("[1, 2]", ".[3]")]
    #[test_case("[1, 2]", ".[-1]")]
    #[test_case(r#"{"tags":[{"id":12}]}"#, ".tags.id")]
    #[test_case(r#"{"category":{"name":"dog"}}"#, ".category[0]")]
    #[test_case(r#"{"owner":null}"#, ".owner")]
    #[test_case(r#"{"owner":null}"#, ".owner.name")]
    #[test_case(r#"{"a":{"":[1]}}"#, ".a[0]")]
    #[test_case("true", ".value")]
    #[test_case(r#""text""#, "..")]
    fn test_nil(input: &str, pattern: &str) {
        let result = document(input).q(pattern);
        assert!(result.is_nil(), "Expected nil, got {result:?}");
    }

    #[test_case("[1, 2, 3]", ".[1", "expected ] for array index")]
    #[test_case("[1, 2, 3]", ".[", "expected ] for array index")]
    #[test_case("[1, 2, 3]", ".[hello]", "expected a number for array index, got: 'hello'")]
    #[test_case("[1, 2, 3]", ".[]", "expected a number for array index, got: ''")]
    #[test_case("[1, 2, 3]", ".[ 1]", "expected a number for array index, got: ' 1'")]
    #[test_case("[1, 2, 3]", ".[0]name", "expected . or [, got: 'name'")]
    #[test_case("[[1]]", ".[0]x[0]", "expected . or [, got: 'x'")]
    #[test_case(r#"{"nums":[[1]]}"#, ".nums[0][zero]", "expected a number for array index, got: 'zero'")]
    fn test_syntax_errors(input: &str, pattern: &str, expected: &str) {
        let result = document(input).q(pattern);
        let error = result.query_error().expect("Should be a query error");
        assert_eq!(error.message(), expected);
        assert_eq!(error.to_string(), expected);
    }

    #[test_case(J::from(json!({"a": 1})))]
    #[test_case(J::from(json!([1])))]
    #[test_case(J::Number(1.0))]
    #[test_case(J::from("s"))]
    #[test_case(J::Bool(true))]
    #[test_case(J::Nil)]
    fn test_identity(value: J) {
        assert_eq!(value.q(""), value);
        assert_eq!(value.q("."), value);
    }

    #[test]
    fn test_nil_absorbs() {
        let j = document(r#"{"name":"Lola"}"#);
        let missing = j.q(".id");
        assert!(missing.is_nil());
        assert_eq!(missing.to_string(), "nil");
        assert!(missing.q(".yaid").is_nil());
        assert!(missing.q(".[").is_nil());
    }

    #[test]
    fn test_error_propagates() {
        let error = document("[1]").q(".[x]");
        assert_eq!(error.q(".name"), error);
        assert_eq!(error.q(""), error);
        assert_eq!(error.q(".[0]").q("."), error);
    }

    #[test]
    fn test_two_step_navigation() {
        let j = document(
            r#"{"name":"Jason","category":{"name":"dogs"},"tags":[{"name":"briard"}]}"#,
        );
        assert_eq!(j.q(".category").q(".name"), j.q(".category.name"));
        assert_eq!(j.q(".tags").q(".[0]").q(".name"), J::from("briard"));
    }

    #[test]
    fn test_query_does_not_mutate() {
        let j = document(r#"{"a":{"b":[1,2]}}"#);
        let before = j.clone();
        let _ = j.q(".a.b[1]");
        let _ = j.q(".a.b[9]");
        assert_eq!(j, before);
    }

    #[test_case("", None)]
    #[test_case("name", None)]
    #[test_case(".name", Some((0, Separator::Dot)))]
    #[test_case("tags[0]", Some((4, Separator::Bracket)))]
    #[test_case("a.b[0]", Some((1, Separator::Dot)))]
    #[test_case("a[0].b", Some((1, Separator::Bracket)))]
    fn test_next_separator(pattern: &str, expected: Option<(usize, Separator)>) {
        assert_eq!(next_separator(pattern), expected);
    }
}
