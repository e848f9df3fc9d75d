use super::*;
use crate::authorizer::AuthorizerRef;
use crate::cors::AllowedOrigins;
use crate::error::ConfigError;
use crate::route::{MethodSelector, RouteResponseBuilder};
use http::{Method, StatusCode};

fn origins() -> AllowedOrigins {
    AllowedOrigins::new(["a.com", "b.com"]).unwrap()
}

fn standard_table() -> RouteTable {
    let mut registrar = RouteRegistrar::new("/");
    registrar
        .add_mocked_method("GET", "/", &origins(), None)
        .unwrap()
        .add_not_found_handler()
        .unwrap();
    registrar.finish()
}

#[test]
fn test_parse_path_pattern() {
    let p = PathPattern::parse("/users/{id}/{proxy+}");
    assert_eq!(
        p.segments(),
        &[
            Segment::Literal("users".into()),
            Segment::Param("id".into()),
            Segment::Greedy("proxy".into()),
        ]
    );
    assert!(PathPattern::parse("/").segments().is_empty());
}

#[test]
fn test_root_get_resolves_to_success() {
    let table = standard_table();
    let route = table.resolve(&Method::GET, "/");
    assert_eq!(route.status, StatusCode::OK);
    assert_eq!(route.path, "/");
}

#[test]
fn test_unregistered_paths_resolve_to_fallback() {
    let table = standard_table();
    for (method, path) in [
        (Method::GET, "/missing"),
        (Method::POST, "/a/b/c"),
        (Method::DELETE, "/"),
        (Method::PATCH, "/?x=1"),
    ] {
        let route = table.resolve(&method, path);
        assert_eq!(route.status, StatusCode::NOT_FOUND, "{method} {path}");
        assert!(!route.has_cors(), "{method} {path}");
    }
}

#[test]
fn test_query_string_ignored() {
    let table = standard_table();
    assert_eq!(table.resolve(&Method::GET, "/?name=x").status, StatusCode::OK);
}

#[test]
fn test_literal_beats_param_beats_greedy() {
    let o = origins();
    let mut registrar = RouteRegistrar::new("/");
    registrar
        .register(
            RouteResponseBuilder::new(&o)
                .status(StatusCode::ACCEPTED)
                .build(MethodSelector::Exact(Method::GET), "/items/{id}"),
        )
        .unwrap()
        .register(
            RouteResponseBuilder::new(&o)
                .status(StatusCode::CREATED)
                .build(MethodSelector::Exact(Method::GET), "/items/special"),
        )
        .unwrap()
        .add_not_found_handler()
        .unwrap();
    let table = registrar.finish();

    assert_eq!(table.resolve(&Method::GET, "/items/special").status, StatusCode::CREATED);
    assert_eq!(table.resolve(&Method::GET, "/items/42").status, StatusCode::ACCEPTED);
    assert_eq!(
        table.resolve(&Method::GET, "/items/42/extra").status,
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_exact_method_beats_any() {
    let o = origins();
    let mut registrar = RouteRegistrar::new("/");
    registrar
        .add_mocked_method("GET", "/{proxy+}", &o, None)
        .unwrap()
        .add_not_found_handler()
        .unwrap();
    let table = registrar.finish();

    assert_eq!(table.resolve(&Method::GET, "/x").status, StatusCode::OK);
    assert_eq!(table.resolve(&Method::PUT, "/x").status, StatusCode::NOT_FOUND);
}

#[test]
fn test_base_path_prefixes_resources() {
    let mut registrar = RouteRegistrar::new("api/");
    assert_eq!(registrar.base(), "/api");
    registrar
        .add_mocked_method("GET", "", &origins(), None)
        .unwrap()
        .add_not_found_handler()
        .unwrap();
    let table = registrar.finish();

    assert_eq!(table.fallback().path, "/api/{proxy+}");
    assert_eq!(table.resolve(&Method::GET, "/api").status, StatusCode::OK);
    assert_eq!(table.resolve(&Method::GET, "/api/nope").status, StatusCode::NOT_FOUND);
}

#[test]
fn test_unknown_method_is_config_error() {
    let mut registrar = RouteRegistrar::new("/");
    let err = registrar
        .add_mocked_method("BREW", "/", &origins(), None)
        .unwrap_err();
    assert_eq!(err, ConfigError::UnknownMethod { method: "BREW".into() });
}

#[test]
fn test_duplicate_route_rejected() {
    let mut registrar = RouteRegistrar::new("/");
    registrar.add_mocked_method("GET", "/", &origins(), None).unwrap();
    let err = registrar
        .add_mocked_method("get", "/", &origins(), None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateRoute { .. }));
}

#[test]
fn test_finish_adds_missing_fallback() {
    let mut registrar = RouteRegistrar::new("/");
    registrar.add_mocked_method("GET", "/", &origins(), None).unwrap();
    let table = registrar.finish();
    assert_eq!(table.len(), 2);
    assert_eq!(table.fallback().status, StatusCode::NOT_FOUND);
    assert_eq!(table.fallback().method, MethodSelector::Any);
}

#[test]
fn test_finish_keeps_registered_catch_all() {
    let mut registrar = RouteRegistrar::new("/");
    registrar
        .register(
            RouteResponseBuilder::new(&origins())
                .status(StatusCode::GONE)
                .raw_body(r#"{"message":"gone"}"#)
                .build(MethodSelector::Any, "/{proxy+}"),
        )
        .unwrap();
    let table = registrar.finish();

    assert_eq!(table.len(), 1);
    assert_eq!(table.fallback().status, StatusCode::GONE);
    assert_eq!(
        table.resolve(&Method::POST, "/anything").body,
        r#"{"message":"gone"}"#
    );
}

#[test]
fn test_authorizer_attached_only_where_requested() {
    let auth = AuthorizerRef::new("custom-authorizer");
    let mut registrar = RouteRegistrar::new("/");
    registrar
        .add_mocked_method("GET", "/", &origins(), Some(&auth))
        .unwrap()
        .add_preflight("/", &origins())
        .unwrap()
        .add_not_found_handler()
        .unwrap();
    let table = registrar.finish();

    let get = table.get(&MethodSelector::Exact(Method::GET), "/").unwrap();
    assert_eq!(get.authorizer.as_ref(), Some(&auth));
    let options = table.get(&MethodSelector::Exact(Method::OPTIONS), "/").unwrap();
    assert!(options.authorizer.is_none());
    assert!(table.fallback().authorizer.is_none());
}
