use super::*;
use crate::headers::{ACCESS_CONTROL_ALLOW_ORIGIN, VARY};
use http::Method;

fn origins(list: &[&str]) -> AllowedOrigins {
    AllowedOrigins::new(list.iter().copied()).unwrap()
}

fn get() -> MethodSelector {
    MethodSelector::Exact(Method::GET)
}

#[test]
fn test_success_route_single_origin() {
    let route = RouteResponseBuilder::success(&origins(&["https://a.com"])).build(get(), "/");
    assert_eq!(route.status, StatusCode::OK);
    assert!(route.origin_template.is_none());
    assert_eq!(route.body, r#"{"message":"Hello World!"}"#);
    assert_eq!(route.response_template(), route.body);
    assert_eq!(route.request_template, r#"{ "statusCode": 200 }"#);
    assert_eq!(route.passthrough_behavior, PassthroughBehavior::Never);
    assert_eq!(
        route.response_parameters().get("method.response.header.Access-Control-Allow-Origin"),
        Some(&"'https://a.com'".to_string())
    );
}

#[test]
fn test_every_header_is_passed_through() {
    let route = RouteResponseBuilder::success(&origins(&["a.com", "b.com"])).build(get(), "/");
    assert_eq!(route.header_passthrough.len(), route.headers.len());
    assert!(route.header_passthrough.values().all(|flag| *flag));
    assert!(route
        .method_response_parameters()
        .contains_key("method.response.header.Vary"));
}

#[test]
fn test_template_precedes_body() {
    let route = RouteResponseBuilder::success(&origins(&["a.com", "b.com"])).build(get(), "/");
    let rendered = route.response_template();
    let template = route.origin_template.as_ref().unwrap().to_velocity();
    assert!(rendered.starts_with(&template));
    assert!(rendered.ends_with("\n{\"message\":\"Hello World!\"}"));
}

#[test]
fn test_not_found_has_no_cors() {
    let route = RouteResponseBuilder::not_found().build(MethodSelector::Any, "/{proxy+}");
    assert_eq!(route.status, StatusCode::NOT_FOUND);
    assert_eq!(route.body, NOT_FOUND_BODY);
    assert!(!route.has_cors());
    assert!(!route.headers.contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(route.origin_template.is_none());
    assert_eq!(route.request_template, r#"{ "statusCode": 404 }"#);
    assert_eq!(route.passthrough_behavior, PassthroughBehavior::WhenNoMatch);
    let body: Value = serde_json::from_str(&route.body).unwrap();
    assert_eq!(body, json!({ "message": "Resource not found" }));
}

#[test]
fn test_preflight_carries_cors() {
    let route = RouteResponseBuilder::preflight(&origins(&["a.com", "b.com"]))
        .build(MethodSelector::Exact(Method::OPTIONS), "/");
    assert_eq!(route.status, StatusCode::NO_CONTENT);
    assert!(route.headers.contains_key(VARY));
    assert!(route.origin_template.is_some());
    assert!(route.body.is_empty());
    let template = route.origin_template.as_ref().unwrap().to_velocity();
    assert_eq!(route.response_template(), template);
}

#[test]
fn test_serialized_route_carries_assembled_template() {
    let route = RouteResponseBuilder::success(&origins(&["a.com", "b.com"])).build(get(), "/");
    let json = serde_json::to_value(&route).unwrap();
    assert_eq!(json["response_template"], route.response_template());
    assert_eq!(json["status"], 200);
    assert_eq!(
        json["response_parameters"]["method.response.header.Vary"],
        "'Origin'"
    );
    assert_eq!(
        json["method_response_parameters"]["method.response.header.Access-Control-Allow-Origin"],
        true
    );
}

#[test]
fn test_authorizer_propagates_unchanged() {
    let auth = AuthorizerRef::new("custom-authorizer");
    let with = RouteResponseBuilder::success(&origins(&["*"]))
        .authorizer(Some(auth.clone()))
        .build(get(), "/");
    assert_eq!(with.authorizer, Some(auth));

    let without = RouteResponseBuilder::success(&origins(&["*"])).build(get(), "/");
    assert_eq!(without.authorizer, None);
}

#[test]
fn test_build_is_deterministic() {
    let list = origins(&["c.com", "a.com", "b.com"]);
    let first = RouteResponseBuilder::success(&list).build(get(), "/");
    let second = RouteResponseBuilder::success(&list).build(get(), "/");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_custom_payload() {
    let route = RouteResponseBuilder::new(&origins(&["*"]))
        .status(StatusCode::CREATED)
        .json_body(&json!({ "id": 7 }))
        .build(MethodSelector::Exact(Method::POST), "/items");
    assert_eq!(route.status.as_u16(), 201);
    assert_eq!(route.body, r#"{"id":7}"#);
    assert_eq!(route.request_template, r#"{ "statusCode": 201 }"#);
}
