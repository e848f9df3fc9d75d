use http::Method;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Methods a mocked route can be registered for
pub const SUPPORTED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
];

/// HTTP method a route answers to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodSelector {
    /// Every method (`ANY`)
    Any,
    /// A single method
    Exact(Method),
}

impl MethodSelector {
    /// Parse a method name (`GET`, `post`, `ANY`, ...)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMethod`] for anything outside
    /// [`SUPPORTED_METHODS`] and `ANY`.
    pub fn parse(method: &str) -> Result<Self, ConfigError> {
        let upper = method.trim().to_ascii_uppercase();
        if upper == "ANY" {
            return Ok(MethodSelector::Any);
        }
        SUPPORTED_METHODS
            .iter()
            .find(|m| m.as_str() == upper)
            .map(|m| MethodSelector::Exact(m.clone()))
            .ok_or_else(|| ConfigError::UnknownMethod {
                method: method.to_string(),
            })
    }

    /// Whether a request with `method` is answered by this selector
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodSelector::Any => true,
            MethodSelector::Exact(m) => m == method,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            MethodSelector::Any => "ANY",
            MethodSelector::Exact(m) => m.as_str(),
        }
    }
}

impl From<Method> for MethodSelector {
    fn from(method: Method) -> Self {
        MethodSelector::Exact(method)
    }
}

impl FromStr for MethodSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MethodSelector::parse(s)
    }
}

impl fmt::Display for MethodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MethodSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
