//! Event-loop server binding (tokio + hyper) with graceful shutdown.
//!
//! # Graceful shutdown and Kubernetes
//!
//! When Kubernetes terminates a pod it sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` (default 30 s) before sending SIGKILL.
//!
//! The server reacts by:
//! 1. Immediately stopping `listener.accept()` — no new connections.
//! 2. Letting every in-flight connection task run to completion.
//! 3. Returning from [`EventServer::serve`], which lets `main` exit cleanly.
//!
//! Set `terminationGracePeriodSeconds` longer than your slowest request.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;
use crate::version::Version;

/// The event-loop HTTP server.
pub struct EventServer {
    addr: SocketAddr,
}

impl EventServer {
    /// Configures the server to bind to `addr` when
    /// [`serve`](EventServer::serve) is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        // One Arc for the whole server; each connection task clones it.
        let router = Arc::new(router);

        info!(addr = %self.addr, "swell listening");

        // JoinSet tracks every spawned connection task so shutdown can wait
        // for them all.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // `biased` checks arms top-to-bottom: a SIGTERM stops
                // accepting even if more connections are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection, not
                        // once per connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { handle(router, req, remote_addr).await }
                        });

                        // `auto::Builder` serves HTTP/1.1 or HTTP/2,
                        // whatever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not
                // grow without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("swell stopped");
        Ok(())
    }
}

/// One request in, one wire response out. Infallible: dispatch resolves
/// every failure internally, so hyper never sees an error.
async fn handle(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(peer = %remote_addr, "failed to read request body: {e}");
            return Ok(bare(http::StatusCode::BAD_REQUEST));
        }
    };

    let request = match from_wire(parts, &bytes, remote_addr) {
        Ok(request) => request,
        Err(status) => return Ok(bare(wire_status(status))),
    };

    Ok(match router.process(request) {
        Some(response) => to_wire(response),
        // The core's deliberate "unhandled" outcome.
        None => bare(http::StatusCode::NOT_FOUND),
    })
}

/// Translates hyper's request parts into the shared model. Fails with the
/// status to answer directly when the wire request cannot be represented.
fn from_wire(
    parts: http::request::Parts,
    body: &[u8],
    remote_addr: SocketAddr,
) -> Result<Request, Status> {
    let method: Method = parts
        .method
        .as_str()
        .parse()
        .map_err(|()| Status::NotImplemented)?;

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let version = match parts.version {
        http::Version::HTTP_10 => Version::Http10,
        http::Version::HTTP_2 => Version::H2,
        _ => Version::Http11,
    };

    let mut request = Request::new(method, target, version)
        .with_remote(remote_addr)
        .with_body(body.to_vec());

    for (name, value) in &parts.headers {
        match value.to_str() {
            Ok(v) => request = request.with_header(name.as_str(), v),
            Err(_) => warn!(header = %name, "skipping non-UTF-8 header value"),
        }
    }

    Ok(request)
}

/// Serializes a core response back into hyper's types.
fn to_wire(response: Response) -> http::Response<Full<Bytes>> {
    let mut builder = http::Response::builder().status(response.status().code());
    for (name, value) in response.headers().iter() {
        builder = builder.header(name, value);
    }
    match builder.body(Full::new(Bytes::from(response.into_body()))) {
        Ok(wire) => wire,
        Err(e) => {
            error!("unserializable response: {e}");
            bare(http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn wire_status(status: Status) -> http::StatusCode {
    http::StatusCode::from_u16(status.code()).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
}

fn bare(status: http::StatusCode) -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .expect("static response")
}

/// Resolves on the first shutdown signal the process receives: SIGTERM or
/// SIGINT on Unix, Ctrl-C elsewhere.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    // On non-Unix platforms the SIGTERM arm never resolves.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(method: &str, uri: &str) -> http::request::Parts {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn from_wire_translates_the_request() {
        let remote: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let req = from_wire(parts("POST", "/persons?limit=3"), b"{}", remote).unwrap();
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/persons");
        assert_eq!(req.query_params().get("limit"), Some("3"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body_bytes(), b"{}");
        assert_eq!(req.remote(), Some(remote));
    }

    #[test]
    fn unknown_methods_are_rejected_before_dispatch() {
        let remote: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let err = from_wire(parts("PURGE", "/cache"), b"", remote).unwrap_err();
        assert_eq!(err, Status::NotImplemented);
    }

    #[test]
    fn to_wire_carries_status_headers_and_body() {
        let mut out = crate::ResponseBuilder::new(Version::Http11);
        let response = out
            .status(Status::Created)
            .header("location", "/persons/7")
            .text("created")
            .build();
        let wire = to_wire(response);
        assert_eq!(wire.status(), http::StatusCode::CREATED);
        assert_eq!(wire.headers()["location"], "/persons/7");
    }
}
