use tracing::{info, warn};

use super::core::RouteTable;
use crate::authorizer::AuthorizerRef;
use crate::cors::AllowedOrigins;
use crate::error::ConfigError;
use crate::route::{MethodSelector, RouteResponseBuilder, RouteSpec};
use http::Method;

/// Path segment of the catch-all resource
pub const PROXY_RESOURCE: &str = "{proxy+}";

/// Registers mocked routes under a base resource
///
/// ```rust
/// use mockgate::{AllowedOrigins, AuthorizerRef, RouteRegistrar};
///
/// let origins = AllowedOrigins::new(["a.com", "b.com"]).unwrap();
/// let auth = AuthorizerRef::new("custom-authorizer");
///
/// let mut registrar = RouteRegistrar::new("/");
/// registrar
///     .add_mocked_method("GET", "/", &origins, Some(&auth)).unwrap()
///     .add_not_found_handler().unwrap();
/// let table = registrar.finish();
///
/// let route = table.resolve(&http::Method::GET, "/missing");
/// assert_eq!(route.status.as_u16(), 404);
/// ```
#[derive(Debug, Clone)]
pub struct RouteRegistrar {
    base: String,
    routes: Vec<RouteSpec>,
    fallback: Option<usize>,
}

impl RouteRegistrar {
    /// Registrar rooted at `base` (e.g. `/` or `/api`)
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let trimmed = base.trim_matches('/');
        let base = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self {
            base,
            routes: Vec::new(),
            fallback: None,
        }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute path of `relative` under the base resource
    #[must_use]
    pub fn resource_path(&self, relative: &str) -> String {
        let relative = relative.trim_matches('/');
        match (self.base.as_str(), relative.is_empty()) {
            ("/", true) => "/".to_string(),
            ("/", false) => format!("/{}", relative),
            (base, true) => base.to_string(),
            (base, false) => format!("{}/{}", base, relative),
        }
    }

    /// Register a built route
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRoute`] if the same method is already
    /// registered on the same path.
    pub fn register(&mut self, spec: RouteSpec) -> Result<&mut Self, ConfigError> {
        if self
            .routes
            .iter()
            .any(|r| r.method == spec.method && r.path == spec.path)
        {
            return Err(ConfigError::DuplicateRoute {
                method: spec.method.to_string(),
                path: spec.path,
            });
        }
        info!(
            method = %spec.method,
            path = %spec.path,
            status = spec.status.as_u16(),
            authorizer = ?spec.authorizer.as_ref().map(|a| a.name.as_str()),
            "Registered route"
        );
        self.routes.push(spec);
        Ok(self)
    }

    /// Register the success response for `method` at `path`, optionally
    /// behind `authorizer`
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownMethod`] or [`ConfigError::DuplicateRoute`].
    pub fn add_mocked_method(
        &mut self,
        method: &str,
        path: &str,
        origins: &AllowedOrigins,
        authorizer: Option<&AuthorizerRef>,
    ) -> Result<&mut Self, ConfigError> {
        let method = MethodSelector::parse(method)?;
        let spec = RouteResponseBuilder::success(origins)
            .authorizer(authorizer.cloned())
            .build(method, &self.resource_path(path));
        self.register(spec)
    }

    /// Register an `OPTIONS` preflight answer at `path`
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateRoute`] if `OPTIONS` is already registered there.
    pub fn add_preflight(
        &mut self,
        path: &str,
        origins: &AllowedOrigins,
    ) -> Result<&mut Self, ConfigError> {
        let spec = RouteResponseBuilder::preflight(origins)
            .build(MethodSelector::Exact(Method::OPTIONS), &self.resource_path(path));
        self.register(spec)
    }

    /// Register the catch-all `ANY {base}/{proxy+}` answering 404
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateRoute`] if called twice.
    pub fn add_not_found_handler(&mut self) -> Result<&mut Self, ConfigError> {
        let spec = RouteResponseBuilder::not_found()
            .build(MethodSelector::Any, &self.resource_path(PROXY_RESOURCE));
        self.register(spec)?;
        self.fallback = Some(self.routes.len() - 1);
        Ok(self)
    }

    /// Finish registration
    ///
    /// Registers the not-found handler if it was never added, so the table
    /// always has a fallback. A route already registered as
    /// `ANY {base}/{proxy+}` is kept and becomes the fallback instead.
    #[must_use]
    pub fn finish(mut self) -> RouteTable {
        let fallback = match self.fallback {
            Some(index) => index,
            None => {
                let catch_all = self.resource_path(PROXY_RESOURCE);
                let existing = self
                    .routes
                    .iter()
                    .position(|r| r.method == MethodSelector::Any && r.path == catch_all);
                match existing {
                    Some(index) => {
                        warn!(
                            path = %catch_all,
                            status = self.routes[index].status.as_u16(),
                            "Using registered catch-all route as fallback"
                        );
                        index
                    }
                    None => {
                        self.routes.push(
                            RouteResponseBuilder::not_found()
                                .build(MethodSelector::Any, &catch_all),
                        );
                        self.routes.len() - 1
                    }
                }
            }
        };
        RouteTable::new(self.routes, fallback)
    }
}
