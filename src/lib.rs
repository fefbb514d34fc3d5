//! # swell
//!
//! A protocol-neutral routing and dispatch core for HTTP services.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The transport does transport things. The core does routing things.
//! [`Router::process`] is a pure, synchronous function from an immutable
//! router and a [`Request`] to an optional [`Response`] — no I/O, no
//! locks, no global state. Any server binding that can build a `Request`
//! from wire bytes and serialize a `Response` back gets exactly the same
//! routing behavior, whether it blocks a thread per request or runs on an
//! event loop. Two such bindings ship in [`server`].
//!
//! What the core owns:
//!
//! - **Routing** — ordered route table; literal segments, `{name}`
//!   parameters, `{name+}` rest captures; first registration wins
//! - **Filters** — ordered pre-handler chain; any filter may short-circuit
//! - **Error routing** — per-status handlers, per-fault-kind handlers, and
//!   a total fallback: a panicking handler still yields a well-formed
//!   response, never an escaping fault
//! - **Typed parameters** — mandatory access fails predictably, defaulted
//!   access never fails
//! - **Body conversion seam** — [`BodyReader`] / [`BodyWriter`]
//!   capabilities; the core never looks inside your bytes
//!
//! ## Quick start
//!
//! ```rust
//! use swell::{Method, Outcome, Request, ResponseBuilder, Router, Status, Version};
//!
//! fn fetch_user(req: &Request, out: &mut ResponseBuilder) -> Outcome {
//!     let id = req.path_params().mandatory::<u64>("id")?;
//!     out.text(format!("user {id}"));
//!     Ok(Some(out.build()))
//! }
//!
//! let router = Router::builder()
//!     .get("/users/{id}", fetch_user)
//!     .build();
//!
//! let resp = router
//!     .process(Request::new(Method::Get, "/users/42", Version::Http11))
//!     .unwrap();
//! assert_eq!(resp.status(), Status::Ok);
//! assert_eq!(resp.body(), b"user 42");
//! ```
//!
//! Serve it:
//!
//! ```rust,no_run
//! # async fn run(router: swell::Router) -> Result<(), swell::Error> {
//! swell::server::EventServer::bind("0.0.0.0:3000").serve(router).await
//! # }
//! ```

mod body;
mod builder;
mod error;
mod fault;
mod handler;
mod headers;
mod method;
mod params;
mod pattern;
mod request;
mod response;
mod router;
mod status;
mod version;
mod ws;

pub mod server;

pub use body::{BodyError, BodyReader, BodyWriter};
pub use builder::RouterBuilder;
pub use error::Error;
pub use fault::{Fault, FaultKind};
pub use handler::{ErrorHandler, FaultHandler, Filter, Handler, IntoOutcome, Outcome};
pub use headers::Headers;
pub use method::Method;
pub use params::{ParamError, Params};
pub use pattern::{PathPattern, PatternError};
pub use request::Request;
pub use response::{Response, ResponseBuilder};
pub use router::{Resolution, Route, Router};
pub use status::Status;
pub use version::Version;
pub use ws::{WsHandler, WsMatch, WsMessage, WsSender, WsSession};
