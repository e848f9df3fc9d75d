//! # Route Responses
//!
//! Builds the complete mocked response for a route: status code, CORS header
//! mapping with pass-through flags, the response body template (with the
//! origin template prepended when several origins are allowed), and the
//! integration request template that selects the status.
//!
//! Three standard shapes are provided:
//!
//! - [`RouteResponseBuilder::success`]: `200` with a greeting payload and full
//!   CORS shaping
//! - [`RouteResponseBuilder::not_found`]: `404` with
//!   `{"message": "Resource not found"}` and **no** CORS headers
//! - [`RouteResponseBuilder::preflight`]: `204` answer to `OPTIONS` with full
//!   CORS shaping
//!
//! The not-found shape deliberately mirrors the deployed behavior: a
//! cross-origin call that hits the fallback gets no
//! `Access-Control-Allow-Origin` and fails the browser's CORS check.

mod method;

pub use method::{MethodSelector, SUPPORTED_METHODS};

use http::StatusCode;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::authorizer::AuthorizerRef;
use crate::cors::{AllowedOrigins, OriginPolicy};
use crate::headers::{response_parameter_key, HeaderMap};
use crate::template::{self, OriginTemplate};

/// Content type every mocked response is rendered for
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body of the fallback route
pub const NOT_FOUND_BODY: &str = r#"{"message": "Resource not found"}"#;

/// Message of the default success payload
pub const DEFAULT_GREETING: &str = "Hello World!";

/// When the host passes an unmapped request body through to the integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassthroughBehavior {
    Never,
    WhenNoMatch,
    WhenNoTemplates,
}

pub(crate) fn serialize_status<S: Serializer>(
    status: &StatusCode,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

/// A fully resolved mocked route
///
/// Immutable once built. Holds no reference to the [`AllowedOrigins`] it was
/// derived from; the resolved headers and template are embedded.
///
/// Serializes with the assembled `response_template` and the
/// `method.response.header.*` parameter maps alongside the raw fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: MethodSelector,
    pub path: String,
    pub status: StatusCode,
    /// Static response headers
    pub headers: HeaderMap,
    /// Header name → pass the mapped value through to the caller
    pub header_passthrough: BTreeMap<String, bool>,
    /// Runs before the body is rendered
    pub origin_template: Option<OriginTemplate>,
    /// Serialized body payload
    pub body: String,
    /// Integration request template selecting the mocked status
    pub request_template: String,
    pub passthrough_behavior: PassthroughBehavior,
    pub authorizer: Option<AuthorizerRef>,
}

impl RouteSpec {
    /// The response body template: origin template (if any), then the body
    #[must_use]
    pub fn response_template(&self) -> String {
        match &self.origin_template {
            Some(t) if self.body.is_empty() => t.to_velocity(),
            Some(t) => format!("{}\n{}", t.to_velocity(), self.body),
            None => self.body.clone(),
        }
    }

    /// Integration response parameters (`method.response.header.X` → `'value'`)
    #[must_use]
    pub fn response_parameters(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| (response_parameter_key(name), value.to_mapping_expression()))
            .collect()
    }

    /// Method response parameters (`method.response.header.X` → pass-through flag)
    #[must_use]
    pub fn method_response_parameters(&self) -> BTreeMap<String, bool> {
        self.header_passthrough
            .iter()
            .map(|(name, flag)| (response_parameter_key(name), *flag))
            .collect()
    }

    /// Whether the route carries any CORS shaping
    #[must_use]
    pub fn has_cors(&self) -> bool {
        !self.headers.is_empty()
    }
}

impl Serialize for RouteSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RouteSpec", 13)?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("status", &self.status.as_u16())?;
        state.serialize_field("headers", &self.headers)?;
        state.serialize_field("header_passthrough", &self.header_passthrough)?;
        state.serialize_field("origin_template", &self.origin_template)?;
        state.serialize_field("body", &self.body)?;
        state.serialize_field("response_template", &self.response_template())?;
        state.serialize_field("response_parameters", &self.response_parameters())?;
        state.serialize_field(
            "method_response_parameters",
            &self.method_response_parameters(),
        )?;
        state.serialize_field("request_template", &self.request_template)?;
        state.serialize_field("passthrough_behavior", &self.passthrough_behavior)?;
        state.serialize_field("authorizer", &self.authorizer)?;
        state.end()
    }
}

/// Builder for [`RouteSpec`]
#[derive(Debug, Clone)]
pub struct RouteResponseBuilder {
    policy: Option<(OriginPolicy, Option<OriginTemplate>)>,
    status: StatusCode,
    body: String,
    passthrough_behavior: PassthroughBehavior,
    authorizer: Option<AuthorizerRef>,
}

impl RouteResponseBuilder {
    /// Builder shaping responses for `origins`
    #[must_use]
    pub fn new(origins: &AllowedOrigins) -> Self {
        let policy = OriginPolicy::new(origins);
        let template = template::generate(origins);
        Self {
            policy: Some((policy, template)),
            status: StatusCode::OK,
            body: String::new(),
            passthrough_behavior: PassthroughBehavior::Never,
            authorizer: None,
        }
    }

    /// Builder producing responses with no CORS headers at all
    #[must_use]
    pub fn without_cors() -> Self {
        Self {
            policy: None,
            status: StatusCode::OK,
            body: String::new(),
            passthrough_behavior: PassthroughBehavior::Never,
            authorizer: None,
        }
    }

    /// `200` greeting, as served by the application method
    #[must_use]
    pub fn success(origins: &AllowedOrigins) -> Self {
        Self::new(origins).json_body(&json!({ "message": DEFAULT_GREETING }))
    }

    /// `404` fallback payload, without CORS headers
    #[must_use]
    pub fn not_found() -> Self {
        Self::without_cors()
            .status(StatusCode::NOT_FOUND)
            .raw_body(NOT_FOUND_BODY)
            .passthrough_behavior(PassthroughBehavior::WhenNoMatch)
    }

    /// `204` preflight answer
    #[must_use]
    pub fn preflight(origins: &AllowedOrigins) -> Self {
        Self::new(origins).status(StatusCode::NO_CONTENT)
    }

    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Serialize `payload` as the body
    #[must_use]
    pub fn json_body(mut self, payload: &Value) -> Self {
        self.body = payload.to_string();
        self
    }

    /// Use `body` verbatim
    #[must_use]
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn passthrough_behavior(mut self, behavior: PassthroughBehavior) -> Self {
        self.passthrough_behavior = behavior;
        self
    }

    #[must_use]
    pub fn authorizer(mut self, authorizer: Option<AuthorizerRef>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Produce the route for `method` on `path`
    #[must_use]
    pub fn build(&self, method: MethodSelector, path: &str) -> RouteSpec {
        let (headers, origin_template) = match &self.policy {
            Some((policy, template)) => (policy.header_map(), template.clone()),
            None => (HeaderMap::new(), None),
        };
        let header_passthrough = headers.keys().map(|k| (k.clone(), true)).collect();

        debug!(
            %method,
            path,
            status = self.status.as_u16(),
            headers = headers.len(),
            dynamic_origin = origin_template.is_some(),
            "Built route response"
        );

        RouteSpec {
            method,
            path: path.to_string(),
            status: self.status,
            headers,
            header_passthrough,
            origin_template,
            body: self.body.clone(),
            request_template: format!("{{ \"statusCode\": {} }}", self.status.as_u16()),
            passthrough_behavior: self.passthrough_behavior,
            authorizer: self.authorizer.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
