//! Outgoing response type and its builder.
//!
//! A [`ResponseBuilder`] is the only mutable state in a dispatch call:
//! created when a request enters, threaded through the filter chain and the
//! handler, frozen exactly once into an immutable [`Response`]. It is never
//! shared across requests or threads.

use crate::body::{BodyError, BodyWriter};
use crate::headers::Headers;
use crate::status::Status;
use crate::version::Version;

/// A frozen outgoing response.
#[derive(Clone, Debug)]
pub struct Response {
    version: Version,
    status: Status,
    headers: Headers,
    body: Vec<u8>,
}

impl Response {
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the response, yielding the body bytes for wire serialization.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Mutate-then-freeze response assembly.
///
/// Defaults to `200 OK` with no headers and no body. Freezing with
/// [`build`](ResponseBuilder::build) or [`error`](ResponseBuilder::error)
/// drains the builder; a spent builder yields empty responses.
///
/// ```
/// # use swell::{ResponseBuilder, Status, Version};
/// let mut out = ResponseBuilder::new(Version::Http11);
/// let resp = out
///     .status(Status::Created)
///     .header("location", "/persons/7")
///     .build();
/// assert_eq!(resp.status(), Status::Created);
/// ```
#[derive(Debug)]
pub struct ResponseBuilder {
    version: Version,
    status: Status,
    headers: Headers,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            status: Status::Ok,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Overrides the default `200 OK`.
    pub fn status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    /// Adds a header, keeping existing values for the same name.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body through a converter capability and stamps
    /// `content-type` from the writer.
    pub fn body<T>(&mut self, value: &T, writer: &impl BodyWriter<T>) -> Result<&mut Self, BodyError> {
        self.body = writer.write(value)?;
        self.headers.set("content-type", writer.content_type());
        Ok(self)
    }

    /// Sets raw body bytes with an explicit content type. For converters,
    /// prefer [`body`](ResponseBuilder::body).
    pub fn bytes(&mut self, content_type: &str, body: Vec<u8>) -> &mut Self {
        self.body = body;
        self.headers.set("content-type", content_type);
        self
    }

    /// Sets a `text/plain; charset=utf-8` body.
    pub fn text(&mut self, body: impl Into<String>) -> &mut Self {
        self.bytes("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Freezes the accumulated state into a [`Response`].
    pub fn build(&mut self) -> Response {
        Response {
            version: self.version,
            status: self.status,
            headers: std::mem::take(&mut self.headers),
            body: std::mem::take(&mut self.body),
        }
    }

    /// Sets the status and freezes immediately, keeping accumulated headers
    /// and body.
    pub fn error(&mut self, status: Status) -> Response {
        self.status = status;
        self.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_200_empty() {
        let resp = ResponseBuilder::new(Version::Http11).build();
        assert_eq!(resp.status(), Status::Ok);
        assert!(resp.body().is_empty());
        assert!(resp.headers().is_empty());
    }

    #[test]
    fn error_freezes_with_status() {
        let mut out = ResponseBuilder::new(Version::Http11);
        out.header("x-request-id", "abc");
        let resp = out.error(Status::NotFound);
        assert_eq!(resp.status(), Status::NotFound);
        assert_eq!(resp.headers().get("x-request-id"), Some("abc"));
    }

    #[test]
    fn text_sets_body_and_content_type() {
        let mut out = ResponseBuilder::new(Version::Http11);
        let resp = out.text("hello").build();
        assert_eq!(resp.body(), b"hello");
        assert_eq!(resp.headers().get("content-type"), Some("text/plain; charset=utf-8"));
    }
}
