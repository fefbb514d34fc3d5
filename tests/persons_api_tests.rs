//! End-to-end scenario: a small persons API wired through a serde JSON
//! body converter. The converter lives here, not in the crate — the core
//! only ever sees the `BodyReader`/`BodyWriter` capabilities.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use swell::{
    BodyError, BodyReader, BodyWriter, Method, Outcome, Request, Response, ResponseBuilder,
    Router, Status, Version,
};

/// The canonical converter pair: serde JSON behind the capability traits.
struct Json;

impl<T: DeserializeOwned> BodyReader<T> for Json {
    fn content_types(&self) -> &[&str] {
        &["application/json"]
    }

    fn read(&self, bytes: &[u8]) -> Result<T, BodyError> {
        serde_json::from_slice(bytes).map_err(BodyError::new)
    }
}

impl<T: Serialize> BodyWriter<T> for Json {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn write(&self, value: &T) -> Result<Vec<u8>, BodyError> {
        serde_json::to_vec(value).map_err(BodyError::new)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
struct Person {
    name: String,
    age: u32,
}

fn not_found(_req: &Request, out: &mut ResponseBuilder) -> Response {
    out.status(Status::NotFound)
        .bytes("application/json", br#"{"error":"person not found"}"#.to_vec());
    out.build()
}

fn persons_router() -> Router {
    let store: Arc<Mutex<HashMap<u64, Person>>> = Arc::new(Mutex::new(HashMap::new()));
    let next_id = Arc::new(AtomicU64::new(1));

    let create_store = Arc::clone(&store);
    let create = move |req: &Request, out: &mut ResponseBuilder| -> Outcome {
        let person: Person = req.body(&Json)?;
        let id = next_id.fetch_add(1, Ordering::Relaxed);
        create_store.lock().unwrap().insert(id, person);
        out.status(Status::Created).body(&id, &Json)?;
        Ok(Some(out.build()))
    };

    let fetch_store = Arc::clone(&store);
    let fetch = move |req: &Request, out: &mut ResponseBuilder| -> Outcome {
        let id = req.path_params().mandatory::<u64>("id")?;
        match fetch_store.lock().unwrap().get(&id) {
            Some(person) => {
                out.body(person, &Json)?;
                Ok(Some(out.build()))
            }
            None => Ok(Some(not_found(req, out))),
        }
    };

    Router::builder()
        .post("/persons", create)
        .get("/persons/{id}", fetch)
        .error(Status::NotFound, not_found)
        .build()
}

fn post_json(router: &Router, path: &str, body: &str) -> Response {
    let req = Request::new(Method::Post, path, Version::Http11)
        .with_header("content-type", "application/json")
        .with_body(body.as_bytes().to_vec());
    router.process(req).unwrap()
}

fn get(router: &Router, path: &str) -> Response {
    router
        .process(Request::new(Method::Get, path, Version::Http11))
        .unwrap()
}

#[test]
fn create_returns_201_and_the_serialized_id() {
    let router = persons_router();

    let resp = post_json(&router, "/persons", r#"{"name":"John","age":30}"#);
    assert_eq!(resp.status(), Status::Created);
    assert_eq!(resp.headers().get("content-type"), Some("application/json"));
    assert_eq!(resp.body(), b"1");

    let resp = post_json(&router, "/persons", r#"{"name":"Jane","age":25}"#);
    assert_eq!(resp.body(), b"2");
}

#[test]
fn fetch_round_trips_a_created_person() {
    let router = persons_router();
    post_json(&router, "/persons", r#"{"name":"John","age":30}"#);

    let resp = get(&router, "/persons/1");
    assert_eq!(resp.status(), Status::Ok);
    let person: Person = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(person, Person { name: "John".into(), age: 30 });
}

#[test]
fn fetch_of_an_unknown_id_returns_the_configured_not_found_response() {
    let router = persons_router();

    let resp = get(&router, "/persons/999");
    assert_eq!(resp.status(), Status::NotFound);
    assert_eq!(resp.body(), br#"{"error":"person not found"}"#);

    // The same configured response serves unmatched paths via the status
    // map — one shape for "not found" everywhere.
    let resp = get(&router, "/nope");
    assert_eq!(resp.status(), Status::NotFound);
    assert_eq!(resp.body(), br#"{"error":"person not found"}"#);
}

#[test]
fn malformed_json_resolves_to_a_body_fault() {
    let router = persons_router();

    let resp = post_json(&router, "/persons", "{not json");
    assert_eq!(resp.status(), Status::BadRequest);
}

#[test]
fn query_parameters_default_without_failing() {
    let router = Router::builder()
        .get("/persons", |req: &Request, out: &mut ResponseBuilder| -> Outcome {
            let limit = req.query_params().or_default::<u32>("limit", 25);
            out.text(format!("limit={limit}"));
            Ok(Some(out.build()))
        })
        .build();

    let resp = router
        .process(Request::new(Method::Get, "/persons?limit=5", Version::Http11))
        .unwrap();
    assert_eq!(resp.body(), b"limit=5");

    let resp = router
        .process(Request::new(Method::Get, "/persons?limit=bogus", Version::Http11))
        .unwrap();
    assert_eq!(resp.body(), b"limit=25");
}
