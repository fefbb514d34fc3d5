//! Route table and dispatch engine.
//!
//! The [`Router`] is the frozen aggregate produced by
//! [`RouterBuilder::build`](crate::RouterBuilder::build): ordered route and
//! filter tables, the status-driven error map, the fault map, and the
//! WebSocket table. Nothing in it mutates after build, so any number of
//! transport threads can call [`Router::process`] concurrently without
//! locking — the only mutable state in a dispatch call is its own
//! [`ResponseBuilder`].
//!
//! Route precedence is registration order. The table is scanned front to
//! back and the first entry whose method and pattern both accept the
//! request wins, so `GET /persons/{id}` registered before
//! `GET /persons/new` captures `/persons/new` with `id="new"`. Order your
//! registrations accordingly.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::fault::{Fault, FaultKind, contain};
use crate::handler::{ErrorHandler, FaultHandler, Filter, Handler};
use crate::method::Method;
use crate::params::Params;
use crate::pattern::PathPattern;
use crate::request::Request;
use crate::response::{Response, ResponseBuilder};
use crate::status::Status;
use crate::ws::WsRoute;

/// A registered (method, pattern, handler) binding.
///
/// `method: None` is the catch-all registration from
/// [`RouterBuilder::any`](crate::RouterBuilder::any).
#[derive(Clone)]
pub struct Route {
    pub(crate) method: Option<Method>,
    pub(crate) pattern: PathPattern,
    pub(crate) handler: Arc<dyn Handler>,
}

#[derive(Clone)]
pub(crate) struct FilterEntry {
    pub(crate) pattern: PathPattern,
    pub(crate) filter: Arc<dyn Filter>,
}

/// The outcome of route resolution, before any handler runs.
///
/// `MethodNotAllowed` is distinguishable from `NotFound`: some pattern
/// matched the path, but only under a different method. The two feed
/// different status outcomes in error routing.
pub enum Resolution {
    Matched { handler: Arc<dyn Handler>, params: Params },
    MethodNotAllowed,
    NotFound,
}

/// The frozen routing aggregate. Cheap to share (`Arc` it once per
/// transport), safe to use from any number of threads.
pub struct Router {
    pub(crate) routes: Vec<Route>,
    pub(crate) filters: Vec<FilterEntry>,
    pub(crate) error_handlers: HashMap<Status, Arc<dyn ErrorHandler>>,
    pub(crate) fault_handlers: HashMap<FaultKind, Arc<dyn FaultHandler>>,
    pub(crate) default_fault: Option<Arc<dyn FaultHandler>>,
    pub(crate) ws_routes: Vec<WsRoute>,
}

impl Router {
    pub fn builder() -> crate::builder::RouterBuilder {
        crate::builder::RouterBuilder::new()
    }

    /// Resolves a (method, path) pair against the route table.
    ///
    /// Ordered linear scan; first match wins. Resolution is read-only, so
    /// resolving the same pair against the same router any number of times
    /// yields the same result.
    pub fn resolve(&self, method: Method, path: &str) -> Resolution {
        let mut other_method = false;
        for route in &self.routes {
            if let Some(params) = route.pattern.match_path(path) {
                match route.method {
                    Some(m) if m != method => other_method = true,
                    _ => {
                        return Resolution::Matched {
                            handler: Arc::clone(&route.handler),
                            params,
                        };
                    }
                }
            }
        }
        if other_method {
            Resolution::MethodNotAllowed
        } else {
            Resolution::NotFound
        }
    }

    /// Dispatches one request to one optional response.
    ///
    /// The full sequence: filters in registration order (any may
    /// short-circuit), route resolution, path-parameter binding, handler
    /// invocation, error/fault routing. Every failure resolves in here —
    /// a panicking handler still yields a well-formed response. `None` is
    /// the deliberate "unhandled" state: the matched handler declined, and
    /// the transport adapter decides what that means on the wire.
    pub fn process(&self, mut req: Request) -> Option<Response> {
        let mut out = ResponseBuilder::new(req.version());

        for entry in &self.filters {
            if entry.pattern.match_path(req.path()).is_none() {
                continue;
            }
            match contain(|| entry.filter.filter(&req, &mut out)) {
                Ok(None) => {}
                Ok(Some(response)) => {
                    debug!(path = req.path(), pattern = entry.pattern.template(), "filter short-circuit");
                    return Some(response);
                }
                Err(fault) => return Some(self.respond_to_fault(&fault, &req)),
            }
        }

        match self.resolve(req.method(), req.path()) {
            Resolution::Matched { handler, params } => {
                req.bind_path_params(params);
                match contain(|| handler.handle(&req, &mut out)) {
                    Ok(outcome) => outcome,
                    Err(fault) => Some(self.respond_to_fault(&fault, &req)),
                }
            }
            Resolution::MethodNotAllowed => {
                debug!(method = %req.method(), path = req.path(), "method not allowed");
                Some(self.respond_to_status(Status::MethodNotAllowed, &req))
            }
            Resolution::NotFound => {
                debug!(method = %req.method(), path = req.path(), "no route matched");
                Some(self.respond_to_status(Status::NotFound, &req))
            }
        }
    }

    /// Status-driven error routing: the configured handler for this exact
    /// status, else a minimal response carrying only the status line.
    fn respond_to_status(&self, status: Status, req: &Request) -> Response {
        let mut out = ResponseBuilder::new(req.version());
        out.status(status);
        match self.error_handlers.get(&status) {
            Some(handler) => contain(|| Ok(handler.handle(req, &mut out)))
                .unwrap_or_else(|fault| self.last_resort(&fault, req)),
            None => out.build(),
        }
    }

    /// Exception-driven routing: the handler registered for the fault's
    /// kind, else the registered default, else the built-in default
    /// (parameter/body faults → 400, everything else → 500).
    fn respond_to_fault(&self, fault: &Fault, req: &Request) -> Response {
        warn!(method = %req.method(), path = req.path(), %fault, "handler fault contained");
        let mut out = ResponseBuilder::new(req.version());
        let custom = self
            .fault_handlers
            .get(&fault.kind())
            .or(self.default_fault.as_ref());
        match custom {
            Some(handler) => contain(|| Ok(handler.handle(fault, req, &mut out)))
                .unwrap_or_else(|inner| self.last_resort(&inner, req)),
            None => out.error(default_fault_status(fault)),
        }
    }

    /// The terminal safety net: a custom error/fault handler itself
    /// panicked. Never consults configuration again.
    fn last_resort(&self, fault: &Fault, req: &Request) -> Response {
        warn!(%fault, "error handler fault; serving minimal 500");
        ResponseBuilder::new(req.version()).error(Status::InternalServerError)
    }
}

fn default_fault_status(fault: &Fault) -> Status {
    match fault.kind() {
        FaultKind::Parameter | FaultKind::Body => Status::BadRequest,
        FaultKind::App | FaultKind::Panic => Status::InternalServerError,
    }
}
