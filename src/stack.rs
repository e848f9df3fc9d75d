//! # Gateway Definition
//!
//! Assembles one complete mocked API from a [`StackConfig`]:
//!
//! 1. Validate the allowed origins
//! 2. Register the mocked success method(s) at the base path, behind the
//!    authorizer when one is configured
//! 3. Register `OPTIONS` preflight answers on the base path and the
//!    catch-all resource
//! 4. Register the catch-all `ANY /{proxy+}` returning 404
//! 5. Attach the CORS-readable error responses for authorization failures
//!
//! The result is a plain value with deterministic serialization, suitable
//! for handing to a hosting runtime or diffing between builds.

use anyhow::{Context, Result};
use http::StatusCode;
use serde::Serialize;
use tracing::info;

use crate::authorizer::{AuthorizerRef, GatewayResponse, ResponseType};
use crate::config::StackConfig;
use crate::cors::AllowedOrigins;
use crate::error::ConfigError;
use crate::router::{RouteRegistrar, RouteTable, PROXY_RESOURCE};

/// Everything the hosting runtime needs for one API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayDefinition {
    pub api_name: String,
    pub stage_name: String,
    pub allowed_origins: AllowedOrigins,
    pub authorizers: Vec<AuthorizerRef>,
    pub routes: RouteTable,
    pub gateway_responses: Vec<GatewayResponse>,
}

fn error_status(status: u16) -> Result<StatusCode, ConfigError> {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .ok_or(ConfigError::InvalidStatus { status })
}

impl GatewayDefinition {
    /// Build the definition described by `config`
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] raised by origin validation or route registration.
    pub fn build(config: &StackConfig) -> Result<Self, ConfigError> {
        let origins = AllowedOrigins::new(config.allowed_origins.iter().cloned())?;
        let authorizer = config.authorizer.as_ref().map(|a| a.to_ref());

        let mut registrar = RouteRegistrar::new(config.base_path.as_str());
        for method in &config.methods {
            registrar.add_mocked_method(method, "", &origins, authorizer.as_ref())?;
        }
        if config.preflight {
            registrar
                .add_preflight("", &origins)?
                .add_preflight(PROXY_RESOURCE, &origins)?;
        }
        registrar.add_not_found_handler()?;
        let routes = registrar.finish();

        let gateway_responses = vec![
            GatewayResponse::permissive(
                ResponseType::Unauthorized,
                error_status(config.unauthorized_status)?,
            ),
            GatewayResponse::permissive(
                ResponseType::MissingAuthenticationToken,
                error_status(config.missing_credentials_status)?,
            ),
        ];

        info!(
            api_name = %config.api_name,
            stage = %config.stage_name,
            routes = routes.len(),
            dynamic_origin = origins.len() > 1,
            authorizer = ?authorizer.as_ref().map(|a| a.name.as_str()),
            "Gateway definition built"
        );

        Ok(Self {
            api_name: config.api_name.clone(),
            stage_name: config.stage_name.clone(),
            allowed_origins: origins,
            authorizers: authorizer.into_iter().collect(),
            routes,
            gateway_responses,
        })
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize gateway definition")
    }

    /// YAML document
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize gateway definition")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthorizerConfig;
    use crate::route::MethodSelector;
    use http::Method;

    fn config(origins: &[&str]) -> StackConfig {
        StackConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            authorizer: Some(AuthorizerConfig {
                name: "custom-authorizer".into(),
                identity_header: "Authorization".into(),
                cache_ttl_secs: 0,
            }),
            ..StackConfig::default()
        }
    }

    #[test]
    fn test_standard_stack_layout() {
        let def = GatewayDefinition::build(&config(&["a.com", "b.com"])).unwrap();
        let routes: Vec<(String, String)> = def
            .routes
            .routes()
            .map(|r| (r.method.to_string(), r.path.clone()))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("GET".to_string(), "/".to_string()),
                ("OPTIONS".to_string(), "/".to_string()),
                ("OPTIONS".to_string(), "/{proxy+}".to_string()),
                ("ANY".to_string(), "/{proxy+}".to_string()),
            ]
        );
        let get = def
            .routes
            .get(&MethodSelector::Exact(Method::GET), "/")
            .unwrap();
        assert_eq!(get.authorizer.as_ref().map(|a| a.name.as_str()), Some("custom-authorizer"));
        assert_eq!(def.authorizers.len(), 1);
    }

    #[test]
    fn test_empty_origins_fail_fast() {
        let err = GatewayDefinition::build(&config(&[])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyOrigins);
    }

    #[test]
    fn test_unknown_method_fails_fast() {
        let mut cfg = config(&["a.com"]);
        cfg.methods = vec!["GET".into(), "FROB".into()];
        let err = GatewayDefinition::build(&cfg).unwrap_err();
        assert_eq!(err, ConfigError::UnknownMethod { method: "FROB".into() });
    }

    #[test]
    fn test_preflight_can_be_disabled() {
        let mut cfg = config(&["a.com"]);
        cfg.preflight = false;
        let def = GatewayDefinition::build(&cfg).unwrap();
        assert_eq!(def.routes.len(), 2);
        assert_eq!(
            def.routes.resolve(&Method::OPTIONS, "/").status,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let cfg = config(&["c.com", "a.com", "b.com"]);
        let a = GatewayDefinition::build(&cfg).unwrap();
        let b = GatewayDefinition::build(&cfg).unwrap();
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
        assert_eq!(a.to_yaml().unwrap(), b.to_yaml().unwrap());
    }

    #[test]
    fn test_json_shape() {
        let def = GatewayDefinition::build(&config(&["a.com"])).unwrap();
        let json: serde_json::Value = serde_json::from_str(&def.to_json().unwrap()).unwrap();
        assert_eq!(json["stage_name"], "dev");
        assert_eq!(json["allowed_origins"][0], "a.com");
        assert_eq!(json["routes"][0]["status"], 200);
        assert_eq!(
            json["routes"][0]["headers"]["Access-Control-Allow-Origin"],
            "'https://a.com'"
        );
        assert_eq!(json["routes"][0]["authorizer"]["cache_ttl_secs"], 0);
        assert_eq!(json["gateway_responses"][0]["response_type"], "UNAUTHORIZED");
        assert_eq!(json["gateway_responses"][0]["status_code"], 403);
    }

    #[test]
    fn test_json_carries_assembled_response_template() {
        let def = GatewayDefinition::build(&config(&["a.com", "b.com"])).unwrap();
        let json: serde_json::Value = serde_json::from_str(&def.to_json().unwrap()).unwrap();
        let template = json["routes"][0]["response_template"].as_str().unwrap();
        assert!(template.starts_with("#set($origin"));
        assert!(template.ends_with("\n{\"message\":\"Hello World!\"}"));
        assert_eq!(
            json["routes"][0]["method_response_parameters"]
                ["method.response.header.Access-Control-Allow-Origin"],
            true
        );
        // Preflight has no body, so no trailing separator
        let preflight = json["routes"][1]["response_template"].as_str().unwrap();
        assert!(preflight.ends_with("#end"));
    }

    #[test]
    fn test_invalid_error_status_fails_fast() {
        let mut cfg = config(&["a.com"]);
        cfg.unauthorized_status = 42;
        assert_eq!(
            GatewayDefinition::build(&cfg).unwrap_err(),
            ConfigError::InvalidStatus { status: 42 }
        );

        let mut cfg = config(&["a.com"]);
        cfg.missing_credentials_status = 200;
        assert_eq!(
            GatewayDefinition::build(&cfg).unwrap_err(),
            ConfigError::InvalidStatus { status: 200 }
        );
    }

    #[test]
    fn test_configured_error_status_is_kept() {
        let mut cfg = config(&["a.com"]);
        cfg.unauthorized_status = 401;
        let def = GatewayDefinition::build(&cfg).unwrap();
        assert_eq!(def.gateway_responses[0].status_code, StatusCode::UNAUTHORIZED);
    }
}
