//! WebSocket routing.
//!
//! The routing contract only: pattern → per-connection handler, resolved
//! once at handshake time, then one dispatch per inbound message. Framing,
//! the handshake itself and connection lifecycle belong to the transport
//! adapter, which is also responsible for serializing message delivery so
//! ordering within one connection is preserved. No filter chain applies.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::warn;

use crate::fault::{Fault, contain};
use crate::params::Params;
use crate::pattern::PathPattern;
use crate::router::Router;

/// One message on a WebSocket connection, either direction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WsMessage {
    Text(String),
    Binary(Vec<u8>),
}

impl WsMessage {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }

    pub fn binary(body: Vec<u8>) -> Self {
        Self::Binary(body)
    }
}

/// An established connection, built by the adapter at handshake time from
/// the resolved match.
pub struct WsSession {
    id: String,
    path: String,
    remote: Option<SocketAddr>,
    params: Params,
}

impl WsSession {
    pub fn new(id: impl Into<String>, path: impl Into<String>, remote: Option<SocketAddr>, params: Params) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            remote,
            params,
        }
    }

    /// Adapter-assigned connection identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn remote(&self) -> Option<SocketAddr> {
        self.remote
    }

    /// Parameters captured by the matched pattern at handshake time.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Collects the zero or more messages a handler emits back onto the
/// connection for one inbound message.
#[derive(Debug, Default)]
pub struct WsSender {
    queue: Vec<WsMessage>,
}

impl WsSender {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, message: WsMessage) {
        self.queue.push(message);
    }

    pub fn send_text(&mut self, body: impl Into<String>) {
        self.send(WsMessage::text(body));
    }

    pub fn send_binary(&mut self, body: Vec<u8>) {
        self.send(WsMessage::binary(body));
    }

    fn into_messages(self) -> Vec<WsMessage> {
        self.queue
    }
}

/// A per-connection message handler.
pub trait WsHandler: Send + Sync + 'static {
    fn on_message(&self, session: &WsSession, message: &WsMessage, out: &mut WsSender) -> Result<(), Fault>;
}

impl<F> WsHandler for F
where
    F: Fn(&WsSession, &WsMessage, &mut WsSender) -> Result<(), Fault> + Send + Sync + 'static,
{
    fn on_message(&self, session: &WsSession, message: &WsMessage, out: &mut WsSender) -> Result<(), Fault> {
        self(session, message, out)
    }
}

#[derive(Clone)]
pub(crate) struct WsRoute {
    pub(crate) pattern: PathPattern,
    pub(crate) handler: Arc<dyn WsHandler>,
}

/// A resolved WebSocket route: the handler that owns the connection and
/// the parameters its pattern captured.
pub struct WsMatch {
    handler: Arc<dyn WsHandler>,
    params: Params,
}

impl WsMatch {
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Dispatches one inbound message, returning the messages to emit back
    /// on the connection.
    ///
    /// Faults are contained exactly as in HTTP dispatch: logged, and the
    /// messages queued before the fault are still delivered. Whether to
    /// close the connection afterwards is the adapter's call.
    pub fn dispatch(&self, session: &WsSession, message: &WsMessage) -> Vec<WsMessage> {
        let mut out = WsSender::new();
        if let Err(fault) = contain(|| self.handler.on_message(session, message, &mut out)) {
            warn!(session = session.id(), path = session.path(), %fault, "websocket handler fault contained");
        }
        out.into_messages()
    }
}

impl Router {
    /// Resolves a connection path against the WebSocket table.
    ///
    /// Same precedence as HTTP resolution: registration order, first
    /// matching pattern wins. Called once per connection at handshake
    /// time; the returned match then serves every message on it.
    pub fn resolve_web_socket(&self, path: &str) -> Option<WsMatch> {
        self.ws_routes.iter().find_map(|route| {
            route.pattern.match_path(path).map(|params| WsMatch {
                handler: Arc::clone(&route.handler),
                params,
            })
        })
    }
}
