//! # Mock Gateway
//!
//! An in-process stand-in for the hosting runtime. It takes a
//! [`GatewayDefinition`], resolves each request against its route table,
//! runs the bound authorizer, executes the route's origin template and
//! returns the response a caller would observe.
//!
//! Useful for checking a definition before deployment and for tests; it is
//! not a server.

use http::{Method, StatusCode};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::authorizer::{AuthorizerBinding, ResponseType};
use crate::error::ConfigError;
use crate::stack::GatewayDefinition;

/// Incoming request
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    /// Header names keep the caller's casing
    pub headers: BTreeMap<String, String>,
}

impl MockRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Response as the caller sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl MockResponse {
    /// Header value by exact name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Host emulator for a gateway definition
#[derive(Debug)]
pub struct MockGateway {
    definition: GatewayDefinition,
    authorizers: HashMap<String, AuthorizerBinding>,
}

impl MockGateway {
    pub fn new(definition: GatewayDefinition) -> Self {
        Self {
            definition,
            authorizers: HashMap::new(),
        }
    }

    /// Bind the callable behind an authorizer handle
    #[must_use]
    pub fn with_authorizer(mut self, binding: AuthorizerBinding) -> Self {
        self.authorizers
            .insert(binding.reference().name.clone(), binding);
        self
    }

    #[must_use]
    pub fn definition(&self) -> &GatewayDefinition {
        &self.definition
    }

    /// Check every authorizer referenced by a route is bound
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownAuthorizer`] naming the first unbound handle.
    pub fn verify(&self) -> Result<(), ConfigError> {
        for route in self.definition.routes.routes() {
            if let Some(auth) = &route.authorizer {
                if !self.authorizers.contains_key(&auth.name) {
                    return Err(ConfigError::UnknownAuthorizer {
                        name: auth.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Handle one request
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownAuthorizer`] if the matched route references an
    /// authorizer that was never bound.
    pub fn handle(&self, request: &MockRequest) -> Result<MockResponse, ConfigError> {
        let route = self
            .definition
            .routes
            .resolve(&request.method, &request.path);

        if let Some(auth) = &route.authorizer {
            let binding =
                self.authorizers
                    .get(&auth.name)
                    .ok_or_else(|| ConfigError::UnknownAuthorizer {
                        name: auth.name.clone(),
                    })?;
            if let Err(failure) = binding.check(&request.headers) {
                info!(
                    method = %request.method,
                    path = %request.path,
                    failure = ?failure,
                    "Request refused by authorizer"
                );
                return Ok(self.gateway_error(failure.response_type()));
            }
        }

        let mut headers: BTreeMap<String, String> = route
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.as_str().to_string()))
            .collect();

        if let Some(template) = &route.origin_template {
            let overrides = template.evaluate(&request.headers);
            debug!(overrides = overrides.len(), "Origin template evaluated");
            headers.extend(overrides);
        }

        Ok(MockResponse {
            status: route.status,
            headers,
            body: route.body.clone(),
        })
    }

    fn gateway_error(&self, response_type: ResponseType) -> MockResponse {
        let configured = self
            .definition
            .gateway_responses
            .iter()
            .find(|r| r.response_type == response_type);

        let status = configured
            .map(|r| r.status_code)
            .unwrap_or_else(|| response_type.default_status());
        let headers = configured
            .map(|r| {
                r.headers
                    .iter()
                    .map(|(name, value)| (name.clone(), value.as_str().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        MockResponse {
            status,
            headers,
            body: r#"{"message":"Unauthorized"}"#.to_string(),
        }
    }
}
