//! Transport providers.
//!
//! Two independent server bindings drive the same dispatch core:
//!
//! - [`EventServer`] — tokio + hyper event loop; HTTP/1.1 and HTTP/2,
//!   graceful drain on SIGTERM / Ctrl-C
//! - [`PoolServer`] — a bounded pool of blocking worker threads over a
//!   plain HTTP/1.1 listener
//!
//! Each binding translates its native request/response types into the
//! shared model and calls [`Router::process`](crate::Router::process); the
//! core has zero references to either binding's types. Because dispatch is
//! synchronous and non-blocking, the event loop calls it inline, and the
//! pool simply blocks a worker per in-flight request. Routing behavior is
//! identical either way.
//!
//! Both bindings answer the core's "unhandled" outcome (`process`
//! returning `None`) with a bare 404.

mod event;
mod pool;

pub use event::EventServer;
pub use pool::PoolServer;
