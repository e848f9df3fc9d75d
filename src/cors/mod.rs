//! # CORS Origin Policy
//!
//! Derives the static CORS response headers for a mocked route from an
//! ordered list of allowed origins, and decides whether the route also needs
//! a per-request origin check.
//!
//! | Allowed origins          | `Access-Control-Allow-Origin` | `Vary`   | Dynamic |
//! |--------------------------|-------------------------------|----------|---------|
//! | `["*"]`                  | `*`                           | -        | no      |
//! | `["https://a.com"]`      | `https://a.com`               | `Origin` | no      |
//! | `["a.com"]`              | `https://a.com`               | `Origin` | no      |
//! | `["a.com", "b.com"]`     | `https://a.com` (placeholder) | `Origin` | yes     |
//!
//! With more than one origin the static value only ever reflects the first
//! entry. The route's origin template (see [`crate::template`]) overrides it
//! at request time.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::headers::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
};

#[cfg(test)]
mod tests;

/// Headers a browser may send on a cross-origin request to a mocked route
pub const DEFAULT_ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent";

/// Methods advertised to browsers for every mocked route
pub const DEFAULT_ALLOW_METHODS: &str = "OPTIONS,GET,PUT,POST,DELETE,PATCH,HEAD";

/// The universal wildcard origin
pub const WILDCARD: &str = "*";

// Anything that would break out of a quoted header literal or a template
// string literal is rejected up front.
#[allow(clippy::expect_used)]
static ORIGIN_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^\s"'$#\\]+$"#).expect("origin syntax regex should be valid")
});

/// Ordered, non-empty list of allowed origins
///
/// The first entry is the representative origin used for the static header.
/// Matching at request time is by membership, not position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    /// Validate and wrap a list of origins
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyOrigins`] if `origins` is empty
    /// - [`ConfigError::InvalidOrigin`] if an entry is blank or contains
    ///   whitespace, quotes, `$`, `#` or `\`
    /// - [`ConfigError::WildcardWithOthers`] if `*` appears alongside other entries
    pub fn new<I, S>(origins: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins: Vec<String> = origins.into_iter().map(Into::into).collect();
        if origins.is_empty() {
            return Err(ConfigError::EmptyOrigins);
        }

        for origin in &origins {
            if !ORIGIN_SYNTAX.is_match(origin) {
                return Err(ConfigError::InvalidOrigin {
                    origin: origin.clone(),
                });
            }
        }

        if origins.len() > 1 && origins.iter().any(|o| o == WILDCARD) {
            return Err(ConfigError::WildcardWithOthers);
        }

        Ok(Self(origins))
    }

    /// The representative origin (first entry)
    #[must_use]
    pub fn primary(&self) -> &str {
        // Non-empty by construction
        self.0.first().map(String::as_str).unwrap_or(WILDCARD)
    }

    /// All entries, in configuration order
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this list is exactly the universal wildcard
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.primary() == WILDCARD
    }
}

/// Static value of `Access-Control-Allow-Origin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginValue {
    /// `*`
    Any,
    /// A fully qualified origin (`scheme://host[:port]`)
    Exact(String),
}

impl OriginValue {
    /// Resolve a configured origin string to a header value
    ///
    /// Bare hosts get an `https://` prefix; anything already starting with
    /// `http` is kept verbatim.
    #[must_use]
    pub fn resolve(origin: &str) -> Self {
        if origin == WILDCARD {
            OriginValue::Any
        } else if origin.starts_with("http") {
            OriginValue::Exact(origin.to_string())
        } else {
            OriginValue::Exact(format!("https://{}", origin))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            OriginValue::Any => WILDCARD,
            OriginValue::Exact(origin) => origin,
        }
    }
}

/// Explicit CORS header configuration for a mocked route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsHeaders {
    /// Value of `Access-Control-Allow-Headers`
    pub allow_headers: String,
    /// Value of `Access-Control-Allow-Methods`
    pub allow_methods: String,
    /// Static value of `Access-Control-Allow-Origin`
    pub allow_origin: OriginValue,
    /// Whether to emit `Vary: Origin`
    pub vary: bool,
}

impl CorsHeaders {
    /// Flatten into a header map
    #[must_use]
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS.to_string(),
            HeaderValue::literal(&self.allow_headers),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS.to_string(),
            HeaderValue::literal(&self.allow_methods),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN.to_string(),
            HeaderValue::literal(self.allow_origin.as_str()),
        );
        if self.vary {
            headers.insert(VARY.to_string(), HeaderValue::literal(ORIGIN));
        }
        headers
    }
}

/// Outcome of evaluating an [`AllowedOrigins`] list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    headers: CorsHeaders,
    is_dynamic: bool,
}

impl OriginPolicy {
    /// Compute the static header set and the dynamic flag for `origins`
    #[must_use]
    pub fn new(origins: &AllowedOrigins) -> Self {
        let primary = origins.primary();
        let headers = CorsHeaders {
            allow_headers: DEFAULT_ALLOW_HEADERS.to_string(),
            allow_methods: DEFAULT_ALLOW_METHODS.to_string(),
            allow_origin: OriginValue::resolve(primary),
            vary: primary != WILDCARD,
        };
        let is_dynamic = origins.len() > 1;

        debug!(
            primary,
            allow_origin = headers.allow_origin.as_str(),
            is_dynamic,
            "Resolved origin policy"
        );

        Self {
            headers,
            is_dynamic,
        }
    }

    /// The explicit header configuration
    #[must_use]
    pub fn cors_headers(&self) -> &CorsHeaders {
        &self.headers
    }

    /// The static header set, flattened
    #[must_use]
    pub fn header_map(&self) -> HeaderMap {
        self.headers.to_header_map()
    }

    /// `true` when more than one origin is allowed and the static
    /// `Access-Control-Allow-Origin` value is only a placeholder
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }
}
