//! # Request Authorizers
//!
//! Mocked routes can be gated by an external authorizer. The configurator
//! never authenticates anything itself: it records which authorizer guards a
//! route ([`AuthorizerRef`]), and wraps the external callable in a uniform
//! contract ([`AuthorizerBinding`]) that a host invokes per request.
//!
//! Authorization failures are answered by the host with a gateway-level
//! response. [`GatewayResponse`] describes those overrides; both default
//! responses carry `Access-Control-Allow-Origin: *` so the browser can read
//! the error.

use dashmap::DashMap;
use http::StatusCode;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::headers::{HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};

/// Header the default authorizer reads its credential from
pub const DEFAULT_IDENTITY_HEADER: &str = "Authorization";

/// Stable handle to an external authorizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizerRef {
    /// Handle name
    pub name: String,
    /// Request header holding the credential
    pub identity_header: String,
    /// How long a decision may be reused; zero disables caching
    #[serde(rename = "cache_ttl_secs", serialize_with = "serialize_secs")]
    pub cache_ttl: Duration,
}

fn serialize_secs<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(ttl.as_secs())
}

impl AuthorizerRef {
    /// Authorizer reading `Authorization` with caching disabled
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            cache_ttl: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_identity_header(mut self, header: impl Into<String>) -> Self {
        self.identity_header = header.into();
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Decision returned by an external authorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny,
}

/// The external authentication callable
///
/// Implemented for any `Fn(&str) -> AuthDecision`, so closures can be bound
/// directly.
pub trait RequestAuthorizer: Send + Sync {
    /// Decide on a credential value
    fn authorize(&self, credential: &str) -> AuthDecision;
}

impl<F> RequestAuthorizer for F
where
    F: Fn(&str) -> AuthDecision + Send + Sync,
{
    fn authorize(&self, credential: &str) -> AuthDecision {
        self(credential)
    }
}

/// Why a request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthFailure {
    /// The identity header was absent or empty
    MissingCredentials,
    /// The authorizer denied the credential
    Rejected,
}

impl AuthFailure {
    /// Gateway response class reported for this failure
    #[must_use]
    pub fn response_type(self) -> ResponseType {
        match self {
            AuthFailure::MissingCredentials => ResponseType::MissingAuthenticationToken,
            AuthFailure::Rejected => ResponseType::Unauthorized,
        }
    }
}

/// An external authorizer bound to its reference
///
/// Decisions are cached per credential for `cache_ttl`. With a zero TTL the
/// callable is consulted on every request.
pub struct AuthorizerBinding {
    reference: AuthorizerRef,
    handler: Arc<dyn RequestAuthorizer>,
    cache: DashMap<String, (Instant, AuthDecision)>,
}

impl fmt::Debug for AuthorizerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizerBinding")
            .field("reference", &self.reference)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl AuthorizerBinding {
    pub fn new(reference: AuthorizerRef, handler: impl RequestAuthorizer + 'static) -> Self {
        Self {
            reference,
            handler: Arc::new(handler),
            cache: DashMap::new(),
        }
    }

    /// Handle usable when registering routes
    #[must_use]
    pub fn reference(&self) -> &AuthorizerRef {
        &self.reference
    }

    /// Authorize a request given its headers
    ///
    /// The identity header is looked up case-insensitively.
    ///
    /// # Errors
    ///
    /// - [`AuthFailure::MissingCredentials`] if the identity header is absent or empty
    /// - [`AuthFailure::Rejected`] if the authorizer denies the credential
    pub fn check(&self, request_headers: &BTreeMap<String, String>) -> Result<(), AuthFailure> {
        let credential = request_headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&self.reference.identity_header))
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .ok_or(AuthFailure::MissingCredentials)?;

        match self.decide(credential) {
            AuthDecision::Allow => Ok(()),
            AuthDecision::Deny => {
                debug!(authorizer = %self.reference.name, "Credential rejected");
                Err(AuthFailure::Rejected)
            }
        }
    }

    fn decide(&self, credential: &str) -> AuthDecision {
        let ttl = self.reference.cache_ttl;
        if ttl.is_zero() {
            return self.handler.authorize(credential);
        }

        if let Some(entry) = self.cache.get(credential) {
            let (decided_at, decision) = *entry;
            if decided_at.elapsed() < ttl {
                return decision;
            }
        }

        let decision = self.handler.authorize(credential);
        self.cache
            .insert(credential.to_string(), (Instant::now(), decision));
        decision
    }

    /// Number of cached decisions (expired entries included)
    #[must_use]
    pub fn cached_decisions(&self) -> usize {
        self.cache.len()
    }
}

/// Class of gateway-generated error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    /// Credentials were presented and rejected
    Unauthorized,
    /// No credentials were presented
    MissingAuthenticationToken,
}

impl ResponseType {
    /// Status the host uses when no override is registered
    #[must_use]
    pub fn default_status(self) -> StatusCode {
        match self {
            ResponseType::Unauthorized => StatusCode::UNAUTHORIZED,
            ResponseType::MissingAuthenticationToken => StatusCode::FORBIDDEN,
        }
    }
}

/// Gateway-level error response override
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayResponse {
    pub response_type: ResponseType,
    #[serde(serialize_with = "crate::route::serialize_status")]
    pub status_code: StatusCode,
    pub headers: HeaderMap,
}

impl GatewayResponse {
    /// Override for `response_type` with a permissive CORS header
    #[must_use]
    pub fn permissive(response_type: ResponseType, status_code: StatusCode) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN.to_string(),
            HeaderValue::literal("*"),
        );
        Self {
            response_type,
            status_code,
            headers,
        }
    }

    /// Default overrides: rejected credentials answer 403, missing
    /// credentials 401, both readable cross-origin
    #[must_use]
    pub fn defaults() -> Vec<GatewayResponse> {
        vec![
            GatewayResponse::permissive(ResponseType::Unauthorized, StatusCode::FORBIDDEN),
            GatewayResponse::permissive(
                ResponseType::MissingAuthenticationToken,
                StatusCode::UNAUTHORIZED,
            ),
        ]
    }

    /// Whether the override lets a browser read the error cross-origin
    #[must_use]
    pub fn is_cors_readable(&self) -> bool {
        let readable = self
            .headers
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_some_and(|v| !v.as_str().is_empty());
        if !readable {
            warn!(response_type = ?self.response_type, "Gateway response has no CORS header");
        }
        readable
    }
}
