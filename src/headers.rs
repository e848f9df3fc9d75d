//! Response header values as they appear in a gateway mapping.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const VARY: &str = "Vary";
pub const ORIGIN: &str = "Origin";

/// Ordered header map.
///
/// A `BTreeMap` keeps serialization byte-identical across builds.
pub type HeaderMap = BTreeMap<String, HeaderValue>;

/// Static value bound to a response header in a mapping rule.
///
/// Rendered single-quoted (`'value'`) in the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderValue(String);

impl HeaderValue {
    pub fn literal(value: impl Into<String>) -> Self {
        HeaderValue(value.into())
    }

    /// The unquoted value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the value as a gateway mapping expression
    #[must_use]
    pub fn to_mapping_expression(&self) -> String {
        format!("'{}'", self.0)
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mapping_expression())
    }
}

impl Serialize for HeaderValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_mapping_expression())
    }
}

/// Key used for a header in integration/method response parameter maps
#[must_use]
pub fn response_parameter_key(name: &str) -> String {
    format!("method.response.header.{}", name)
}
