#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Writes a stack configuration to a temporary YAML file
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("mockgate_test_")
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}

pub mod stacks {
    use mockgate::{
        AuthDecision, AuthorizerBinding, AuthorizerConfig, GatewayDefinition, MockGateway,
        StackConfig,
    };

    pub const AUTHORIZER: &str = "custom-authorizer";
    pub const GOOD_TOKEN: &str = "letmein";

    pub fn config(origins: &[&str]) -> StackConfig {
        StackConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            ..StackConfig::default()
        }
    }

    pub fn config_with_authorizer(origins: &[&str]) -> StackConfig {
        StackConfig {
            authorizer: Some(AuthorizerConfig {
                name: AUTHORIZER.into(),
                identity_header: "Authorization".into(),
                cache_ttl_secs: 0,
            }),
            ..config(origins)
        }
    }

    /// Gateway accepting only [`GOOD_TOKEN`]
    pub fn gateway(config: &StackConfig) -> MockGateway {
        let definition = GatewayDefinition::build(config).unwrap();
        let mut gateway = MockGateway::new(definition);
        if let Some(auth) = &config.authorizer {
            gateway = gateway.with_authorizer(AuthorizerBinding::new(
                auth.to_ref(),
                |token: &str| {
                    if token == GOOD_TOKEN {
                        AuthDecision::Allow
                    } else {
                        AuthDecision::Deny
                    }
                },
            ));
        }
        gateway
    }
}
