use std::fmt;

use crate::QueryError;

/// Errors produced while encoding, decoding or configuring responses.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed JSON, or JSON whose shape does not match the target type.
    Decode(serde_json::Error),
    /// The value could not be represented as JSON.
    Encode(serde_json::Error),
    /// Text was expected but the input is empty.
    EmptyBody,
    /// A `J` was requested but the document is a bare `null`.
    NullRoot,
    /// Attempted to decode a `J::Nil`.
    NilValue,
    /// Attempted to decode a `J::Error`.
    Query(QueryError),
    /// An error format must contain exactly one `%s` placeholder.
    InvalidErrorFormat { format: String, placeholders: usize },
}

impl Error {
    pub(crate) fn decode(error: serde_json::Error) -> Self {
        Error::Decode(error)
    }

    pub(crate) fn encode(error: serde_json::Error) -> Self {
        Error::Encode(error)
    }

    pub(crate) fn invalid_error_format(format: impl Into<String>, placeholders: usize) -> Self {
        Error::InvalidErrorFormat {
            format: format.into(),
            placeholders,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(error) => write!(f, "Failed to decode JSON: {error}"),
            Error::Encode(error) => write!(f, "Failed to encode JSON: {error}"),
            Error::EmptyBody => f.write_str("body is empty"),
            Error::NullRoot => f.write_str("cannot unmarshal null into J"),
            Error::NilValue => f.write_str("cannot unmarshal nil J"),
            Error::Query(error) => write!(f, "cannot unmarshal query error: {error}"),
            Error::InvalidErrorFormat {
                format,
                placeholders: 0,
            } => write!(f, "Error format '{format}' does not have '%s'"),
            Error::InvalidErrorFormat {
                format,
                placeholders,
            } => write!(
                f,
                "Error format '{format}' has {placeholders} '%s' placeholders, expected one"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(error) | Error::Encode(error) => Some(error),
            Error::Query(error) => Some(error),
            _ => None,
        }
    }
}
