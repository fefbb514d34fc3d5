//! Incoming request type.
//!
//! A [`Request`] is the protocol-neutral value a transport adapter builds
//! from wire bytes: method, raw target, protocol version, ordered headers,
//! remote address, body bytes. Query parameters are parsed once at
//! construction; path parameters are bound by the dispatch engine after a
//! route matches — never by the adapter.

use std::net::SocketAddr;

use crate::body::{BodyError, BodyReader};
use crate::headers::Headers;
use crate::method::Method;
use crate::params::Params;
use crate::version::Version;

/// An incoming request.
#[derive(Debug)]
pub struct Request {
    method: Method,
    target: String,
    path: String,
    version: Version,
    headers: Headers,
    remote: Option<SocketAddr>,
    body: Vec<u8>,
    query: Params,
    path_params: Params,
}

impl Request {
    /// Builds a request from a method, a raw target (path plus optional
    /// query string) and a protocol version. Headers, body and remote
    /// address attach through the `with_` methods.
    pub fn new(method: Method, target: impl Into<String>, version: Version) -> Self {
        let target = target.into();
        let (path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query)),
            None => (target.clone(), None),
        };
        let mut query = Params::new();
        if let Some(raw) = raw_query {
            for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                query.insert(&name, value.into_owned());
            }
        }
        Self {
            method,
            target,
            path,
            version,
            headers: Headers::new(),
            remote: None,
            body: Vec::new(),
            query,
            path_params: Params::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_remote(mut self, remote: SocketAddr) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The raw request target, query string included.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The path component of the target.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Case-insensitive header lookup, first value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn remote(&self) -> Option<SocketAddr> {
        self.remote
    }

    /// Raw body bytes. Interpretation belongs to a [`BodyReader`].
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Reads the body through a converter capability. The router performs
    /// no validation of its own; the reader owns the interpretation.
    ///
    /// The error converts into [`Fault::Body`](crate::Fault::Body), so `?`
    /// works directly in handlers.
    pub fn body<T>(&self, reader: &impl BodyReader<T>) -> Result<T, BodyError> {
        reader.read(&self.body)
    }

    /// Path parameters captured by the matched route pattern.
    ///
    /// Empty until dispatch binds them — filters run before route
    /// resolution and observe no path parameters.
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Query parameters, form-urldecoded from the target.
    pub fn query_params(&self) -> &Params {
        &self.query
    }

    pub(crate) fn bind_path_params(&mut self, params: Params) {
        self.path_params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_splits_into_path_and_query() {
        let req = Request::new(Method::Get, "/persons?limit=10&q=a%20b", Version::Http11);
        assert_eq!(req.path(), "/persons");
        assert_eq!(req.target(), "/persons?limit=10&q=a%20b");
        assert_eq!(req.query_params().get("limit"), Some("10"));
        assert_eq!(req.query_params().get("q"), Some("a b"));
    }

    #[test]
    fn bare_target_has_no_query() {
        let req = Request::new(Method::Get, "/persons", Version::Http11);
        assert!(req.query_params().is_empty());
        assert!(req.path_params().is_empty());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = Request::new(Method::Get, "/", Version::Http11)
            .with_header("Content-Type", "application/json");
        assert_eq!(req.header("content-type"), Some("application/json"));
    }
}
