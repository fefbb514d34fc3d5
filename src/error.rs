//! Unified infrastructure error type.
//!
//! Application-level failures never appear here: a 404, a bad parameter or
//! a panicking handler all resolve to responses inside dispatch. This type
//! surfaces the infrastructure failures of the server bindings — binding a
//! port, accepting connections, spawning workers.

use thiserror::Error;

/// The error type returned by swell's fallible server operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("bind: {0}")]
    Bind(String),
}
