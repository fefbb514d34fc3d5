//! Router assembly.
//!
//! The builder accumulates routes, filters and error handlers mutably,
//! then [`build`](RouterBuilder::build) snapshots them into an immutable
//! [`Router`]. Build borrows the builder, so you can keep registering and
//! build again — a previously built router never observes later mutation.
//! That snapshot is the whole thread-safety story: after build there is no
//! shared mutable routing state to protect.
//!
//! Registration order is meaningful twice over: filters execute in it, and
//! overlapping route patterns resolve by it (first registered wins).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::fault::FaultKind;
use crate::handler::{ErrorHandler, FaultHandler, Filter, Handler};
use crate::method::Method;
use crate::pattern::PathPattern;
use crate::router::{FilterEntry, Route, Router};
use crate::status::Status;
use crate::ws::{WsHandler, WsRoute};

/// Accumulates routing configuration; see the module docs.
///
/// Registration methods chain by value. Invalid path templates panic at
/// registration — a route table is startup configuration, and a bad
/// template should stop the program before it serves anything. Use
/// [`PathPattern::compile`] directly when you need the error as a value.
#[derive(Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
    filters: Vec<FilterEntry>,
    error_handlers: HashMap<Status, Arc<dyn ErrorHandler>>,
    fault_handlers: HashMap<FaultKind, Arc<dyn FaultHandler>>,
    default_fault: Option<Arc<dyn FaultHandler>>,
    ws_routes: Vec<WsRoute>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a method + path template pair.
    pub fn route(mut self, method: Method, template: &str, handler: impl Handler) -> Self {
        let pattern = compile(template);
        debug!(method = %method, template, "route registered");
        self.routes.push(Route {
            method: Some(method),
            pattern,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn get(self, template: &str, handler: impl Handler) -> Self {
        self.route(Method::Get, template, handler)
    }

    pub fn post(self, template: &str, handler: impl Handler) -> Self {
        self.route(Method::Post, template, handler)
    }

    pub fn put(self, template: &str, handler: impl Handler) -> Self {
        self.route(Method::Put, template, handler)
    }

    pub fn delete(self, template: &str, handler: impl Handler) -> Self {
        self.route(Method::Delete, template, handler)
    }

    pub fn patch(self, template: &str, handler: impl Handler) -> Self {
        self.route(Method::Patch, template, handler)
    }

    /// Registers a catch-all handler: matches the template under any
    /// method. Ordinary registration-order precedence applies, so a
    /// catch-all registered first shadows later routes on the same paths.
    pub fn any(mut self, template: &str, handler: impl Handler) -> Self {
        let pattern = compile(template);
        debug!(template, "catch-all route registered");
        self.routes.push(Route {
            method: None,
            pattern,
            handler: Arc::new(handler),
        });
        self
    }

    /// Registers a filter. Filters run before route resolution, in
    /// registration order, for every request whose path matches.
    pub fn filter(mut self, template: &str, filter: impl Filter) -> Self {
        let pattern = compile(template);
        debug!(template, "filter registered");
        self.filters.push(FilterEntry {
            pattern,
            filter: Arc::new(filter),
        });
        self
    }

    /// Registers a WebSocket handler for a path template.
    pub fn web_socket(mut self, template: &str, handler: impl WsHandler) -> Self {
        let pattern = compile(template);
        debug!(template, "websocket route registered");
        self.ws_routes.push(WsRoute {
            pattern,
            handler: Arc::new(handler),
        });
        self
    }

    /// Customizes the response for a status-driven outcome (e.g.
    /// `Status::NotFound`, `Status::MethodNotAllowed`). Registering the
    /// same status twice keeps the last handler.
    pub fn error(mut self, status: Status, handler: impl ErrorHandler) -> Self {
        self.error_handlers.insert(status, Arc::new(handler));
        self
    }

    /// Customizes the response for faults of one kind.
    pub fn fault(mut self, kind: FaultKind, handler: impl FaultHandler) -> Self {
        self.fault_handlers.insert(kind, Arc::new(handler));
        self
    }

    /// Replaces the default fault handler — the fallback for kinds without
    /// their own registration. It must always produce a response; dispatch
    /// treats a panic in here as a minimal 500.
    pub fn default_fault(mut self, handler: impl FaultHandler) -> Self {
        self.default_fault = Some(Arc::new(handler));
        self
    }

    /// Snapshots the accumulated configuration into an immutable
    /// [`Router`]. The builder stays usable; later registrations affect
    /// only routers built after them.
    pub fn build(&self) -> Router {
        Router {
            routes: self.routes.clone(),
            filters: self.filters.clone(),
            error_handlers: self.error_handlers.clone(),
            fault_handlers: self.fault_handlers.clone(),
            default_fault: self.default_fault.clone(),
            ws_routes: self.ws_routes.clone(),
        }
    }
}

fn compile(template: &str) -> PathPattern {
    PathPattern::compile(template)
        .unwrap_or_else(|e| panic!("invalid route template `{template}`: {e}"))
}
