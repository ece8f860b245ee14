use brrtmatch::router::{LookupResult, Router, RouterBuilder};

fn zoo_router() -> Router<&'static str> {
    let mut builder = RouterBuilder::new();
    builder
        .extend([
            ("GET", None::<&str>, "/", "root_handler"),
            ("GET", None, "/zoo/animals", "get_animals"),
            ("POST", None, "/zoo/animals", "create_animal"),
            ("GET", None, "/zoo/animals/:id:int", "get_animal"),
            ("PUT", None, "/zoo/animals/:id:int", "update_animal"),
            ("PATCH", None, "/zoo/animals/:id:int", "patch_animal"),
            ("DELETE", None, "/zoo/animals/:id:int", "delete_animal"),
            ("GET", None, "/zoo/animals/:name", "get_animal_by_name"),
            ("GET", None, "/zoo/animals/featured", "featured_animal"),
            ("GET", None, "/zoo/weights/:kg:float", "weight"),
            ("GET", None, "/zoo/files/*path", "zoo_files"),
            ("HEAD", None, "/zoo/health", "health_check"),
            ("OPTIONS", None, "/zoo/health", "supported_ops"),
            ("TRACE", None, "/zoo/health", "trace_route"),
        ])
        .unwrap();
    builder.seal()
}

fn assert_route_match(router: &Router<&'static str>, method: &str, path: &str, expected: &str) {
    match router.lookup(method, None, path) {
        LookupResult::Matched(m) => assert_eq!(
            *m.route_id(),
            expected,
            "Expected handler `{expected}` for {method} {path}"
        ),
        LookupResult::NoMatch => panic!("Expected match for {method} {path}, got none"),
    }
}

#[test]
fn test_verb_routes() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/", "root_handler");
    assert_route_match(&router, "GET", "/zoo/animals", "get_animals");
    assert_route_match(&router, "POST", "/zoo/animals", "create_animal");
    assert_route_match(&router, "GET", "/zoo/animals/123", "get_animal");
    assert_route_match(&router, "PUT", "/zoo/animals/123", "update_animal");
    assert_route_match(&router, "PATCH", "/zoo/animals/123", "patch_animal");
    assert_route_match(&router, "DELETE", "/zoo/animals/123", "delete_animal");
    assert_route_match(&router, "HEAD", "/zoo/health", "health_check");
    assert_route_match(&router, "OPTIONS", "/zoo/health", "supported_ops");
    assert_route_match(&router, "TRACE", "/zoo/health", "trace_route");
}

#[test]
fn test_specificity_order() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/zoo/animals/featured", "featured_animal");
    assert_route_match(&router, "GET", "/zoo/animals/-7", "get_animal");
    assert_route_match(&router, "GET", "/zoo/animals/leo", "get_animal_by_name");
    assert_route_match(&router, "GET", "/zoo/animals/1.5", "get_animal_by_name");
}

#[test]
fn test_float_params() {
    let router = zoo_router();
    for value in ["1", "-2.5", ".5", "3.", "-0"] {
        let path = format!("/zoo/weights/{value}");
        let found = router.lookup("GET", None, &path);
        assert_eq!(found.params(), &[("kg", value)], "value {value}");
    }
    for value in ["-", ".", "1e5", "1.2.3", "abc"] {
        let path = format!("/zoo/weights/{value}");
        assert!(!router.lookup("GET", None, &path).is_match(), "value {value}");
    }
}

#[test]
fn test_unknown_paths() {
    let router = zoo_router();
    let bad_paths = [
        ("GET", "/not/a/real/path"),
        ("GET", "/zoo"),
        ("GET", "/zoo/animals/1/extra"),
        ("POST", "/zoo/animals/1"),
        ("GET", "/zoo/files"),
        ("GET", "/zoo/files/"),
        ("GET", "/zoo/files//"),
        ("DELETE", "/"),
    ];
    for (method, path) in bad_paths {
        assert_eq!(
            router.lookup(method, None, path),
            LookupResult::NoMatch,
            "{method} {path}"
        );
    }
}

#[test]
fn test_wildcard_keeps_inner_slashes() {
    let router = zoo_router();
    let found = router.lookup("GET", None, "/zoo/files/maps/2024//north.png");
    assert_eq!(found.route_id(), Some(&"zoo_files"));
    assert_eq!(found.params(), &[("path", "maps/2024//north.png")]);
}

#[test]
fn test_trailing_slash_is_significant() {
    let router = zoo_router();
    assert!(!router.lookup("GET", None, "/zoo/animals/").is_match());

    let mut builder = RouterBuilder::new();
    builder.register("GET", None, "/docs/", 1).unwrap();
    builder.register("GET", None, "/docs", 2).unwrap();
    let router = builder.seal();
    assert_eq!(router.lookup("GET", None, "/docs/").route_id(), Some(&1));
    assert_eq!(router.lookup("GET", None, "/docs").route_id(), Some(&2));
}

#[test]
fn test_router_shared_across_threads() {
    let router = std::sync::Arc::new(zoo_router());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let router = std::sync::Arc::clone(&router);
            std::thread::spawn(move || {
                let path = format!("/zoo/animals/{i}");
                let found = router.lookup("GET", None, &path);
                assert_eq!(found.route_id(), Some(&"get_animal"));
                assert_eq!(found.params()[0].1, i.to_string());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
