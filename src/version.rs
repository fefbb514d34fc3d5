//! Protocol version token.

use std::fmt;

/// The protocol version a request arrived on.
///
/// Carried through dispatch so error paths and builders stamp responses
/// with the version the transport actually negotiated. The core never
/// branches on it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Version {
    Http10,
    Http11,
    H2,
}

impl Version {
    /// Returns the wire token (e.g. `"HTTP/1.1"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
            Self::H2     => "HTTP/2.0",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
