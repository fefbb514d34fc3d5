//! Handler and filter capability traits.
//!
//! The route and filter tables store opaque callables (`Arc<dyn Handler>`,
//! `Arc<dyn Filter>`), not a type hierarchy. Blanket impls let any closure
//! or `fn` with the right shape register directly:
//!
//! ```text
//! fn fetch(req: &Request, out: &mut ResponseBuilder) -> Outcome { … }
//!        ↓ builder.get("/persons/{id}", fetch)
//! Arc::new(fetch)  stored as Arc<dyn Handler>
//!        ↓ at request time
//! handler.handle(&req, &mut out)   ← one virtual call per request
//! ```
//!
//! Handlers are synchronous on purpose: dispatch is a pure function from
//! `(Router, Request)` to a response, and both the thread-pooled and the
//! event-loop transport call it inline. A handler must not block
//! indefinitely; blocking I/O belongs on the thread-pooled binding.

use crate::fault::Fault;
use crate::request::Request;
use crate::response::{Response, ResponseBuilder};

/// What an invocation produces: a response, the deliberate "no response"
/// terminal state, or a fault for exception routing.
pub type Outcome = Result<Option<Response>, Fault>;

/// A route handler.
///
/// Receives the request (path parameters bound) and the dispatch call's
/// response builder. Returning `Ok(None)` means "unhandled": dispatch
/// yields no response and the transport adapter decides what that means.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: &Request, out: &mut ResponseBuilder) -> Outcome;
}

impl<F, R> Handler for F
where
    F: Fn(&Request, &mut ResponseBuilder) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn handle(&self, req: &Request, out: &mut ResponseBuilder) -> Outcome {
        self(req, out).into_outcome()
    }
}

/// A pre-handler filter.
///
/// Filters run in registration order over every request whose path matches
/// their pattern, before route resolution — so path parameters are not yet
/// bound. A filter that returns a response short-circuits dispatch; one
/// that returns `Ok(None)` declines, and any builder mutations it made
/// (headers, status) carry through to the handler.
pub trait Filter: Send + Sync + 'static {
    fn filter(&self, req: &Request, out: &mut ResponseBuilder) -> Outcome;
}

impl<F, R> Filter for F
where
    F: Fn(&Request, &mut ResponseBuilder) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn filter(&self, req: &Request, out: &mut ResponseBuilder) -> Outcome {
        self(req, out).into_outcome()
    }
}

/// Response customization for a status-driven outcome (no route matched,
/// method not allowed). Registered per exact [`Status`](crate::Status);
/// the builder arrives with that status already set.
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(&self, req: &Request, out: &mut ResponseBuilder) -> Response;
}

impl<F> ErrorHandler for F
where
    F: Fn(&Request, &mut ResponseBuilder) -> Response + Send + Sync + 'static,
{
    fn handle(&self, req: &Request, out: &mut ResponseBuilder) -> Response {
        self(req, out)
    }
}

/// Response customization for a fault. Registered per
/// [`FaultKind`](crate::FaultKind); the default registration is the
/// terminal safety net and must always produce a response.
pub trait FaultHandler: Send + Sync + 'static {
    fn handle(&self, fault: &Fault, req: &Request, out: &mut ResponseBuilder) -> Response;
}

impl<F> FaultHandler for F
where
    F: Fn(&Fault, &Request, &mut ResponseBuilder) -> Response + Send + Sync + 'static,
{
    fn handle(&self, fault: &Fault, req: &Request, out: &mut ResponseBuilder) -> Response {
        self(fault, req, out)
    }
}

/// Conversion into an [`Outcome`], so handlers and filters can return the
/// shape that reads best at each site.
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Outcome {
        Ok(Some(self))
    }
}

impl IntoOutcome for Option<Response> {
    fn into_outcome(self) -> Outcome {
        Ok(self)
    }
}

impl IntoOutcome for Result<Response, Fault> {
    fn into_outcome(self) -> Outcome {
        self.map(Some)
    }
}
