use std::fmt;

/// Configuration error
///
/// Returned while building a gateway definition. Every variant is fatal:
/// the configurator never substitutes a default for an invalid input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The allowed origins list was empty
    EmptyOrigins,
    /// An allowed origin contains characters that cannot be embedded in a
    /// response template or header literal
    InvalidOrigin {
        /// The offending origin string
        origin: String,
    },
    /// The wildcard origin (`*`) was combined with concrete origins
    WildcardWithOthers,
    /// An HTTP method outside the supported set was requested
    UnknownMethod {
        /// The method as supplied by the caller
        method: String,
    },
    /// The same method was registered twice on one path
    DuplicateRoute {
        /// HTTP method (or `ANY`)
        method: String,
        /// Resource path
        path: String,
    },
    /// A configured gateway error status is not a 4xx or 5xx code
    InvalidStatus {
        /// The status as configured
        status: u16,
    },
    /// A route references an authorizer that was never bound
    UnknownAuthorizer {
        /// The authorizer handle name
        name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyOrigins => {
                write!(
                    f,
                    "Configuration error: allowed origins list is empty. \
                    Specify at least one origin, or \"*\" to allow any origin."
                )
            }
            ConfigError::InvalidOrigin { origin } => {
                write!(
                    f,
                    "Configuration error: invalid origin '{}'. \
                    Expected \"*\", a bare host (example.com) or scheme://host[:port]",
                    origin
                )
            }
            ConfigError::WildcardWithOthers => {
                write!(
                    f,
                    "Configuration error: wildcard origin (*) cannot be combined with other origins"
                )
            }
            ConfigError::UnknownMethod { method } => {
                write!(f, "Configuration error: unknown HTTP method '{}'", method)
            }
            ConfigError::DuplicateRoute { method, path } => {
                write!(
                    f,
                    "Configuration error: route {} {} is already registered",
                    method, path
                )
            }
            ConfigError::InvalidStatus { status } => {
                write!(
                    f,
                    "Configuration error: invalid error response status {}. \
                    Expected a client or server error code (400-599)",
                    status
                )
            }
            ConfigError::UnknownAuthorizer { name } => {
                write!(
                    f,
                    "Configuration error: authorizer '{}' is referenced but not bound",
                    name
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
