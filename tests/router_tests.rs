//! Route-table resolution behavior: precedence, idempotence, the
//! not-found / method-not-allowed split, and builder snapshot semantics.

use swell::{Method, Outcome, Request, Resolution, ResponseBuilder, Router, Status, Version};

fn text_handler(body: &'static str) -> impl Fn(&Request, &mut ResponseBuilder) -> Outcome {
    move |_req: &Request, out: &mut ResponseBuilder| {
        out.text(body);
        Ok(Some(out.build()))
    }
}

fn get(router: &Router, path: &str) -> Option<swell::Response> {
    router.process(Request::new(Method::Get, path, Version::Http11))
}

#[test]
fn registration_order_wins_over_specificity() {
    // `{id}` registered first shadows the literal `new` — deliberately so.
    // Route order is part of the configuration, not a hint.
    let router = Router::builder()
        .get("/persons/{id}", |req: &Request, out: &mut ResponseBuilder| -> Outcome {
            let id = req.path_params().mandatory::<String>("id")?;
            out.text(format!("id={id}"));
            Ok(Some(out.build()))
        })
        .get("/persons/new", text_handler("new-form"))
        .build();

    let resp = get(&router, "/persons/new").unwrap();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(resp.body(), b"id=new");
}

#[test]
fn literal_first_registration_takes_the_literal() {
    let router = Router::builder()
        .get("/persons/new", text_handler("new-form"))
        .get("/persons/{id}", text_handler("by-id"))
        .build();

    assert_eq!(get(&router, "/persons/new").unwrap().body(), b"new-form");
    assert_eq!(get(&router, "/persons/7").unwrap().body(), b"by-id");
}

#[test]
fn resolution_is_idempotent() {
    let router = Router::builder()
        .get("/persons/{id}", text_handler("by-id"))
        .build();

    for _ in 0..3 {
        match router.resolve(Method::Get, "/persons/42") {
            Resolution::Matched { params, .. } => assert_eq!(params.get("id"), Some("42")),
            _ => panic!("expected a match"),
        }
        assert_eq!(get(&router, "/persons/42").unwrap().body(), b"by-id");
    }
}

#[test]
fn wrong_method_is_distinguished_from_no_route() {
    let router = Router::builder()
        .get("/persons/{id}", text_handler("by-id"))
        .build();

    assert!(matches!(
        router.resolve(Method::Post, "/persons/42"),
        Resolution::MethodNotAllowed
    ));
    assert!(matches!(
        router.resolve(Method::Get, "/unknown"),
        Resolution::NotFound
    ));

    let resp = router
        .process(Request::new(Method::Post, "/persons/42", Version::Http11))
        .unwrap();
    assert_eq!(resp.status(), Status::MethodNotAllowed);

    let resp = get(&router, "/unknown").unwrap();
    assert_eq!(resp.status(), Status::NotFound);
}

#[test]
fn catch_all_matches_any_method_after_specific_routes() {
    let router = Router::builder()
        .get("/persons/{id}", text_handler("by-id"))
        .any("/{path+}", text_handler("fallback"))
        .build();

    assert_eq!(get(&router, "/persons/42").unwrap().body(), b"by-id");
    assert_eq!(get(&router, "/anything/else").unwrap().body(), b"fallback");

    let resp = router
        .process(Request::new(Method::Delete, "/persons/42", Version::Http11))
        .unwrap();
    assert_eq!(resp.body(), b"fallback");
}

#[test]
fn built_router_ignores_later_builder_mutation() {
    let builder = Router::builder().get("/a", text_handler("a"));
    let first = builder.build();

    let builder = builder.get("/b", text_handler("b"));
    let second = builder.build();

    assert_eq!(get(&first, "/a").unwrap().body(), b"a");
    assert_eq!(get(&first, "/b").unwrap().status(), Status::NotFound);

    assert_eq!(get(&second, "/a").unwrap().body(), b"a");
    assert_eq!(get(&second, "/b").unwrap().body(), b"b");
}

#[test]
fn concurrent_dispatch_needs_no_locking() {
    let router = std::sync::Arc::new(
        Router::builder()
            .get("/persons/{id}", text_handler("by-id"))
            .build(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let router = std::sync::Arc::clone(&router);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let resp = router
                        .process(Request::new(Method::Get, "/persons/9", Version::Http11))
                        .unwrap();
                    assert_eq!(resp.body(), b"by-id");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
