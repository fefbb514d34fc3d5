//! Body converter capabilities.
//!
//! The core never interprets body bytes. Reading a typed value out of a
//! request and writing one into a response both go through these traits,
//! supplied by the application (a serde JSON pair, a template engine, a
//! plain-text codec). The declared content types are negotiation hints for
//! documentation and tooling — the router does not enforce them.

use thiserror::Error;

/// Failed body conversion.
#[derive(Debug, Error)]
#[error("body conversion failed: {message}")]
pub struct BodyError {
    message: String,
}

impl BodyError {
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self { message: cause.to_string() }
    }
}

/// Reads a typed value from request body bytes.
///
/// Invoked only through [`Request::body`](crate::Request::body).
pub trait BodyReader<T> {
    /// MIME types this reader accepts. A hint, never enforced.
    fn content_types(&self) -> &[&str];

    fn read(&self, bytes: &[u8]) -> Result<T, BodyError>;
}

/// Writes a typed value into response body bytes.
///
/// Invoked only through [`ResponseBuilder::body`](crate::ResponseBuilder::body),
/// which also stamps `content-type` with [`BodyWriter::content_type`].
pub trait BodyWriter<T> {
    /// The MIME type of the produced bytes.
    fn content_type(&self) -> &str;

    fn write(&self, value: &T) -> Result<Vec<u8>, BodyError>;
}
