use super::*;

fn policy(origins: &[&str]) -> OriginPolicy {
    let origins = AllowedOrigins::new(origins.iter().copied()).expect("valid origins");
    OriginPolicy::new(&origins)
}

fn origin_header(policy: &OriginPolicy) -> Option<String> {
    policy
        .header_map()
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.as_str().to_string())
}

#[test]
fn test_single_exact_origin() {
    let p = policy(&["https://a.com"]);
    assert_eq!(origin_header(&p).as_deref(), Some("https://a.com"));
    assert!(!p.is_dynamic());
    // Vary follows the primary origin, not the origin count
    assert!(p.cors_headers().vary);
}

#[test]
fn test_wildcard_has_no_vary() {
    let p = policy(&["*"]);
    let headers = p.header_map();
    assert_eq!(origin_header(&p).as_deref(), Some("*"));
    assert!(!headers.contains_key(VARY));
    assert!(!p.is_dynamic());
    assert_eq!(p.cors_headers().allow_origin, OriginValue::Any);
}

#[test]
fn test_bare_host_gets_https_prefix() {
    let p = policy(&["a.com"]);
    assert_eq!(origin_header(&p).as_deref(), Some("https://a.com"));
    assert_eq!(
        p.header_map().get(ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.to_mapping_expression()),
        Some("'https://a.com'".to_string())
    );
}

#[test]
fn test_http_scheme_kept_verbatim() {
    let p = policy(&["http://localhost:3000"]);
    assert_eq!(origin_header(&p).as_deref(), Some("http://localhost:3000"));
}

#[test]
fn test_multiple_origins_use_first_as_placeholder() {
    let p = policy(&["a.com", "b.com"]);
    assert!(p.is_dynamic());
    assert_eq!(origin_header(&p).as_deref(), Some("https://a.com"));
    assert_eq!(
        p.header_map().get(VARY).map(|v| v.as_str()),
        Some("Origin")
    );
}

#[test]
fn test_fixed_allow_lists() {
    let headers = policy(&["a.com"]).header_map();
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_HEADERS).map(|v| v.as_str()),
        Some(DEFAULT_ALLOW_HEADERS)
    );
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_METHODS).map(|v| v.as_str()),
        Some(DEFAULT_ALLOW_METHODS)
    );
    assert_eq!(headers.len(), 4);
}

#[test]
fn test_empty_origins_rejected() {
    let err = AllowedOrigins::new(Vec::<String>::new()).unwrap_err();
    assert_eq!(err, ConfigError::EmptyOrigins);
}

#[test]
fn test_template_metacharacters_rejected() {
    for bad in ["", "a.com\"", "$origin", "#set", "a b.com", "it's.com"] {
        let err = AllowedOrigins::new([bad]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidOrigin {
                origin: bad.to_string()
            },
            "expected {bad:?} to be rejected"
        );
    }
}

#[test]
fn test_wildcard_cannot_mix() {
    let err = AllowedOrigins::new(["a.com", "*"]).unwrap_err();
    assert_eq!(err, ConfigError::WildcardWithOthers);
}

#[test]
fn test_primary_is_first_entry() {
    let origins = AllowedOrigins::new(["b.com", "a.com"]).unwrap();
    assert_eq!(origins.primary(), "b.com");
    assert_eq!(origins.len(), 2);
    assert!(!origins.is_wildcard());
}
