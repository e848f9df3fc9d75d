//! # Stack Configuration
//!
//! Loads the description of one mocked API from YAML, with environment
//! overrides for the values that change between deployments.
//!
//! ## Example
//!
//! ```yaml
//! api_name: Api Gateway Example 01 API
//! stage_name: dev
//! allowed_origins:
//!   - localhost:3000
//!   - example.com
//! methods: [GET]
//! authorizer:
//!   name: custom-authorizer
//!   identity_header: Authorization
//!   cache_ttl_secs: 0
//! ```
//!
//! ## Environment Variables
//!
//! ### `MOCKGATE_ALLOWED_ORIGINS`
//!
//! Comma-separated list replacing `allowed_origins`, e.g.
//! `https://app.example.com,localhost:3000`. Blank entries are ignored.
//!
//! ### `MOCKGATE_STAGE`
//!
//! Replaces `stage_name`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::authorizer::{AuthorizerRef, DEFAULT_IDENTITY_HEADER};

pub const ENV_ALLOWED_ORIGINS: &str = "MOCKGATE_ALLOWED_ORIGINS";
pub const ENV_STAGE: &str = "MOCKGATE_STAGE";

fn default_api_name() -> String {
    "Mock Gateway API".to_string()
}

fn default_stage_name() -> String {
    "dev".to_string()
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_identity_header() -> String {
    DEFAULT_IDENTITY_HEADER.to_string()
}

fn default_unauthorized_status() -> u16 {
    403
}

fn default_missing_credentials_status() -> u16 {
    401
}

/// Authorizer section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizerConfig {
    pub name: String,
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
    #[serde(default)]
    pub cache_ttl_secs: u64,
}

impl AuthorizerConfig {
    #[must_use]
    pub fn to_ref(&self) -> AuthorizerRef {
        AuthorizerRef::new(self.name.clone())
            .with_identity_header(self.identity_header.clone())
            .with_cache_ttl(Duration::from_secs(self.cache_ttl_secs))
    }
}

/// Top-level stack configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default = "default_api_name")]
    pub api_name: String,
    #[serde(default = "default_stage_name")]
    pub stage_name: String,
    /// Ordered allow-list; validated when the stack is built
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Methods served with the mocked success response at the base path
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    /// Register `OPTIONS` preflight answers
    #[serde(default = "default_true")]
    pub preflight: bool,
    #[serde(default)]
    pub authorizer: Option<AuthorizerConfig>,
    /// Status for rejected credentials
    #[serde(default = "default_unauthorized_status")]
    pub unauthorized_status: u16,
    /// Status for missing credentials
    #[serde(default = "default_missing_credentials_status")]
    pub missing_credentials_status: u16,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            api_name: default_api_name(),
            stage_name: default_stage_name(),
            allowed_origins: Vec::new(),
            base_path: default_base_path(),
            methods: default_methods(),
            preflight: true,
            authorizer: None,
            unauthorized_status: default_unauthorized_status(),
            missing_credentials_status: default_missing_credentials_status(),
        }
    }
}

impl StackConfig {
    /// Parse YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse stack configuration")
    }

    /// Read a YAML file and apply environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.apply_overrides(|key| env::var(key).ok());
        debug!(path = %path.display(), origins = config.allowed_origins.len(), "Loaded stack config");
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ALLOWED_ORIGINS) {
            let origins: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if origins.is_empty() {
                warn!(
                    variable = ENV_ALLOWED_ORIGINS,
                    "Override is blank, keeping configured origins"
                );
            } else {
                self.allowed_origins = origins;
            }
        }
        if let Some(stage) = lookup(ENV_STAGE) {
            let stage = stage.trim();
            if !stage.is_empty() {
                self.stage_name = stage.to_string();
            }
        }
    }
}
