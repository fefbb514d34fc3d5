//! Thread-pooled blocking server binding (tiny_http).
//!
//! A bounded pool of worker threads shares one listener; each worker
//! blocks on accept, converts the wire request, dispatches, and writes
//! the response — one thread occupied per in-flight request. The binding
//! exists mostly to demonstrate that the dispatch core behaves identically
//! under a scheduling model that is nothing like the event loop's.
//!
//! Runs until the process exits; graceful drain belongs to the event-loop
//! binding.

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::thread;

use tracing::{error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;
use crate::version::Version;

const DEFAULT_WORKERS: usize = 8;

/// The thread-pooled HTTP server.
pub struct PoolServer {
    addr: String,
    workers: usize,
}

impl PoolServer {
    /// Configures the server to bind to `addr` when
    /// [`serve`](PoolServer::serve) is called.
    pub fn bind(addr: &str) -> Self {
        Self {
            addr: addr.to_owned(),
            workers: DEFAULT_WORKERS,
        }
    }

    /// Sets the worker-thread count (default 8). One thread blocks per
    /// in-flight request, so this bounds concurrency.
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = count.max(1);
        self
    }

    /// Starts the worker pool and serves until the process exits.
    pub fn serve(self, router: Router) -> Result<(), Error> {
        let server =
            tiny_http::Server::http(self.addr.as_str()).map_err(|e| Error::Bind(e.to_string()))?;
        let server = Arc::new(server);
        let router = Arc::new(router);

        info!(addr = %self.addr, workers = self.workers, "swell listening");

        let mut handles = Vec::with_capacity(self.workers);
        for worker in 0..self.workers {
            let server = Arc::clone(&server);
            let router = Arc::clone(&router);
            let handle = thread::Builder::new()
                .name(format!("swell-worker-{worker}"))
                .spawn(move || worker_loop(&server, &router))?;
            handles.push(handle);
        }

        for handle in handles {
            let _ = handle.join();
        }
        Ok(())
    }
}

fn worker_loop(server: &tiny_http::Server, router: &Router) {
    loop {
        let incoming = match server.recv() {
            Ok(incoming) => incoming,
            Err(e) => {
                error!("accept error: {e}");
                break;
            }
        };
        respond(incoming, router);
    }
}

fn respond(mut incoming: tiny_http::Request, router: &Router) {
    let request = match from_wire(&mut incoming) {
        Ok(request) => request,
        Err(status) => {
            let _ = incoming.respond(tiny_http::Response::empty(tiny_http::StatusCode(status.code())));
            return;
        }
    };

    match router.process(request) {
        Some(response) => {
            let _ = incoming.respond(to_wire(response));
        }
        // The core's deliberate "unhandled" outcome.
        None => {
            let _ = incoming.respond(tiny_http::Response::empty(tiny_http::StatusCode(404)));
        }
    }
}

/// Translates a tiny_http request into the shared model. Fails with the
/// status to answer directly when the wire request cannot be represented.
fn from_wire(incoming: &mut tiny_http::Request) -> Result<Request, Status> {
    let method: Method = incoming
        .method()
        .to_string()
        .parse()
        .map_err(|()| Status::NotImplemented)?;

    let version = incoming.http_version();
    let version = if version.0 == 1 && version.1 == 0 {
        Version::Http10
    } else {
        Version::Http11
    };

    let target = incoming.url().to_owned();
    let remote = incoming.remote_addr().copied();

    let mut body = Vec::new();
    if incoming.as_reader().read_to_end(&mut body).is_err() {
        return Err(Status::BadRequest);
    }

    let mut request = Request::new(method, target, version).with_body(body);
    if let Some(addr) = remote {
        request = request.with_remote(addr);
    }
    for header in incoming.headers() {
        request = request.with_header(header.field.to_string(), header.value.as_str());
    }

    Ok(request)
}

/// Serializes a core response back into tiny_http's types.
fn to_wire(response: Response) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let mut headers = Vec::with_capacity(response.headers().len());
    for (name, value) in response.headers().iter() {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => headers.push(header),
            Err(()) => warn!(header = name, "skipping unserializable header"),
        }
    }

    let status = tiny_http::StatusCode(response.status().code());
    let body = response.into_body();
    let length = body.len();
    tiny_http::Response::new(status, headers, Cursor::new(body), Some(length), None)
}
