//! Rendering typed values into HTTP-shaped replies, independent of any server.
//!
//! ```rust
//! use jfetch::{ErrorFormat, RespondOptions, Marshal};
//!
//! #[derive(Marshal)]
//! struct Pet {
//!     name: String,
//! }
//!
//! let options = RespondOptions::new().error_format(ErrorFormat::new(r#"{"msg":"%s"}"#)?);
//!
//! let reply = options.respond(&Pet { name: "Lola".to_string() });
//! assert_eq!(reply.status, 200);
//! assert_eq!(reply.body, r#"{"name":"Lola"}"#);
//!
//! let reply = options.respond_error(404, &"no such pet");
//! assert_eq!(reply.body, r#"{"msg":"no such pet"}"#);
//! # Ok::<(), jfetch::Error>(())
//! ```
use std::{any::Any, collections::BTreeMap, fmt, marker::PhantomData};

use serde::{de::DeserializeOwned, Serialize};

use crate::{marshal, unmarshal, Empty, Error, J};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";
pub const DEFAULT_ERROR_FORMAT: &str = r#"{"error":"%s"}"#;

/// Template for error bodies with a single `%s` placeholder for the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorFormat {
    prefix: String,
    suffix: String,
    is_json: bool,
}

impl ErrorFormat {
    /// Parses a template such as `{"error":"%s"}`, `{"error":{"message":"%s"}}` or a bare `%s`.
    ///
    /// # Errors
    ///
    /// Fails unless `format` contains exactly one `%s`.
    pub fn new(format: &str) -> Result<Self, Error> {
        match format.split_once("%s") {
            Some((prefix, suffix)) if !suffix.contains("%s") => Ok(Self {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
                is_json: unmarshal::<J>(format).is_ok(),
            }),
            Some(_) => Err(Error::invalid_error_format(
                format,
                format.matches("%s").count(),
            )),
            None => Err(Error::invalid_error_format(format, 0)),
        }
    }

    /// Whether rendered bodies are JSON documents.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.is_json
    }

    #[must_use]
    pub fn content_type(&self) -> &'static str {
        if self.is_json {
            CONTENT_TYPE_JSON
        } else {
            CONTENT_TYPE_TEXT
        }
    }

    /// Substitutes `message`, escaping it when the template is JSON.
    #[must_use]
    pub fn render(&self, message: &str) -> String {
        let message = if self.is_json {
            let quoted = serde_json::Value::from(message).to_string();
            quoted[1..quoted.len() - 1].to_string()
        } else {
            message.to_string()
        };
        format!("{}{message}{}", self.prefix, self.suffix)
    }
}

impl Default for ErrorFormat {
    fn default() -> Self {
        Self {
            prefix: r#"{"error":""#.to_string(),
            suffix: r#""}"#.to_string(),
            is_json: true,
        }
    }
}

/// A rendered reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub content_type: &'static str,
    pub body: String,
}

/// A body together with the status and headers it should be sent with.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: T,
}

impl<T> Response<T> {
    /// A `200` response without extra headers.
    pub fn new(body: T) -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body,
        }
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Configuration for rendering replies.
///
/// Defaults: status `200`, error status `500`, no extra headers, error format
/// [`DEFAULT_ERROR_FORMAT`].
#[derive(Debug, Clone)]
pub struct RespondOptions {
    status: u16,
    error_status: u16,
    headers: BTreeMap<String, String>,
    error_format: ErrorFormat,
}

impl Default for RespondOptions {
    fn default() -> Self {
        Self {
            status: 200,
            error_status: 500,
            headers: BTreeMap::new(),
            error_format: ErrorFormat::default(),
        }
    }
}

impl RespondOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of successful replies.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Status used when the body cannot be marshalled or a handler fails.
    #[must_use]
    pub fn error_status(mut self, status: u16) -> Self {
        self.error_status = status;
        self
    }

    /// Adds a header to every reply.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn error_format(mut self, format: ErrorFormat) -> Self {
        self.error_format = format;
        self
    }

    /// Renders `body` with the configured status and headers.
    ///
    /// Strings and bytes are sent verbatim as plain text, [`Empty`] as an empty body and
    /// everything else as JSON.
    pub fn respond<T>(&self, body: &T) -> Reply
    where
        T: Serialize + 'static,
    {
        self.render(self.status, &self.headers, body)
    }

    /// Renders `response`, taking status and headers from it instead of the options.
    pub fn respond_with<T>(&self, response: &Response<T>) -> Reply
    where
        T: Serialize + 'static,
    {
        self.render(response.status, &response.headers, &response.body)
    }

    /// Renders `error` through the error format.
    ///
    /// An invalid `status` is replaced with `500`.
    pub fn respond_error(&self, status: u16, error: &dyn fmt::Display) -> Reply {
        self.respond_error_with(status, &self.headers, error)
    }

    fn respond_error_with(
        &self,
        status: u16,
        headers: &BTreeMap<String, String>,
        error: &dyn fmt::Display,
    ) -> Reply {
        let status = if is_valid_status(status) {
            status
        } else {
            tracing::error!(status, %error, "Invalid error status");
            500
        };
        self.error_reply(status, headers, &error.to_string())
    }

    fn render<T>(&self, status: u16, headers: &BTreeMap<String, String>, body: &T) -> Reply
    where
        T: Serialize + 'static,
    {
        if !is_valid_status(status) {
            tracing::error!(status, "Invalid response status");
            return self.error_reply(500, headers, &format!("invalid response status {status}"));
        }
        if !is_valid_status(self.error_status) {
            tracing::error!(status = self.error_status, "Invalid error status");
            return self.error_reply(
                500,
                headers,
                &format!("invalid error status {}", self.error_status),
            );
        }
        if let Some(text) = plain_text(body) {
            return Reply {
                status,
                headers: headers.clone(),
                content_type: CONTENT_TYPE_TEXT,
                body: text,
            };
        }
        match marshal(body) {
            Ok(json) => Reply {
                status,
                headers: headers.clone(),
                content_type: CONTENT_TYPE_JSON,
                body: json,
            },
            Err(error) => {
                tracing::warn!(%error, "Failed to marshal response body");
                self.error_reply(
                    self.error_status,
                    headers,
                    &format!("failed to marshal response body: {error}"),
                )
            }
        }
    }

    fn error_reply(&self, status: u16, headers: &BTreeMap<String, String>, message: &str) -> Reply {
        Reply {
            status,
            headers: headers.clone(),
            content_type: self.error_format.content_type(),
            body: self.error_format.render(message),
        }
    }
}

fn is_valid_status(status: u16) -> bool {
    (100..=599).contains(&status)
}

fn plain_text<T: 'static>(body: &T) -> Option<String> {
    let body = body as &dyn Any;
    if let Some(text) = body.downcast_ref::<String>() {
        Some(text.clone())
    } else if let Some(text) = body.downcast_ref::<&'static str>() {
        Some((*text).to_string())
    } else if let Some(bytes) = body.downcast_ref::<Vec<u8>>() {
        Some(String::from_utf8_lossy(bytes).into_owned())
    } else if body.is::<Empty>() {
        Some(String::new())
    } else {
        None
    }
}

/// An error carrying the status and headers of its reply.
///
/// Returned from a [`Handler`] function, it overrides the configured error status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: u16,
    pub message: String,
    pub headers: BTreeMap<String, String>,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// A request body together with the request attributes around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request<T> {
    pub headers: BTreeMap<String, String>,
    pub path_values: BTreeMap<String, String>,
    pub parameters: BTreeMap<String, String>,
    pub body: T,
}

impl<T> Request<T> {
    pub fn new(body: T) -> Self {
        Self {
            headers: BTreeMap::new(),
            path_values: BTreeMap::new(),
            parameters: BTreeMap::new(),
            body,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn path_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_values.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    fn with_body<U>(self, body: U) -> Request<U> {
        Request {
            headers: self.headers,
            path_values: self.path_values,
            parameters: self.parameters,
            body,
        }
    }
}

/// A typed function adapted to string request bodies.
///
/// The body is decoded with [`unmarshal`](crate::unmarshal); decoding failures produce a `400`
/// reply. Errors returned by the function produce a reply with the error status, or with the
/// status of an [`HttpError`].
pub struct Handler<F, In, Out> {
    apply: F,
    options: RespondOptions,
    marker: PhantomData<fn(In) -> Out>,
}

/// Adapts `apply` into a [`Handler`] with default [`RespondOptions`].
///
/// ```rust
/// use jfetch::{handler, Marshal, Unmarshal};
///
/// #[derive(Marshal, Unmarshal, Default)]
/// struct Pet {
///     name: String,
/// }
///
/// let rename = handler(|pet: Pet| -> Result<Pet, String> {
///     Ok(Pet { name: pet.name.to_uppercase() })
/// });
/// let reply = rename.handle(r#"{"name":"lola"}"#);
/// assert_eq!(reply.body, r#"{"name":"LOLA"}"#);
/// ```
///
/// Functions taking a [`Request`] see the request attributes as well:
///
/// ```rust
/// use jfetch::{handler, Empty, HttpError, Request};
///
/// let find = handler(|request: Request<Empty>| -> Result<String, HttpError> {
///     match request.path_values.get("id").map(String::as_str) {
///         Some("1") => Ok("Lola".to_string()),
///         _ => Err(HttpError::new(404, "no such pet")),
///     }
/// });
/// let reply = find.handle_request(Request::new("").path_value("id", "2"));
/// assert_eq!(reply.status, 404);
/// assert_eq!(reply.body, r#"{"error":"no such pet"}"#);
/// ```
pub fn handler<In, Out, E, F>(apply: F) -> Handler<F, In, Out>
where
    F: Fn(In) -> Result<Out, E>,
{
    Handler {
        apply,
        options: RespondOptions::default(),
        marker: PhantomData,
    }
}

impl<F, In, Out> Handler<F, In, Out> {
    #[must_use]
    pub fn with_options(mut self, options: RespondOptions) -> Self {
        self.options = options;
        self
    }

    fn reject(&self, error: &Error) -> Reply {
        tracing::debug!(%error, "Failed to parse request body");
        self.options
            .respond_error(400, &format_args!("parse request body: {error}"))
    }

    fn reply<E>(&self, result: Result<Out, E>) -> Reply
    where
        Out: Serialize + 'static,
        E: fmt::Display + 'static,
    {
        match result {
            Ok(output) => self.options.respond(&output),
            Err(error) => {
                tracing::debug!(%error, "Handler failed");
                match (&error as &dyn Any).downcast_ref::<HttpError>() {
                    Some(http) => {
                        let mut headers = self.options.headers.clone();
                        headers.extend(http.headers.clone());
                        self.options
                            .respond_error_with(http.status, &headers, &error)
                    }
                    None => self
                        .options
                        .respond_error(self.options.error_status, &error),
                }
            }
        }
    }
}

impl<F, In, Out, E> Handler<F, In, Out>
where
    F: Fn(In) -> Result<Out, E>,
    In: DeserializeOwned + 'static,
    Out: Serialize + 'static,
    E: fmt::Display + 'static,
{
    /// Decodes `body`, applies the function and renders its result.
    pub fn handle(&self, body: &str) -> Reply {
        match unmarshal::<In>(body) {
            Ok(input) => self.reply((self.apply)(input)),
            Err(error) => self.reject(&error),
        }
    }
}

impl<F, In, Out, E> Handler<F, Request<In>, Out>
where
    F: Fn(Request<In>) -> Result<Out, E>,
    In: DeserializeOwned + 'static,
    Out: Serialize + 'static,
    E: fmt::Display + 'static,
{
    /// Decodes the body of `request` and applies the function to the decoded request.
    pub fn handle_request(&self, request: Request<&str>) -> Reply {
        match unmarshal::<In>(request.body) {
            Ok(body) => self.reply((self.apply)(request.with_body(body))),
            Err(error) => self.reject(&error),
        }
    }
}

impl<F, In, Out> fmt::Debug for Handler<F, In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
