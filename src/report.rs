//! Human-readable summary of a gateway definition.

use anyhow::{Context, Result};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::stack::GatewayDefinition;

const INSPECT_TEMPLATE: &str = r#"API {{ api_name }} (stage: {{ stage_name }})
Allowed origins: {{ origins | join(", ") }}{% if dynamic %} [dynamic]{% endif %}

{% for r in routes -%}
{{ r.method }} {{ r.path }} -> {{ r.status }}{% if r.cors %}  cors{% endif %}{% if r.dynamic %}+template{% endif %}{% if r.authorizer %}  auth={{ r.authorizer }}{% endif %}
{% endfor %}
{% for g in gateway_responses -%}
{{ g.kind }} -> {{ g.status }}{% if g.cors %} (cors){% endif %}
{% endfor -%}
"#;

#[derive(Debug, Serialize)]
struct RouteRow<'a> {
    method: &'a str,
    path: &'a str,
    status: u16,
    cors: bool,
    dynamic: bool,
    authorizer: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GatewayRow {
    kind: String,
    status: u16,
    cors: bool,
}

/// Render the route table as a text report
///
/// # Errors
///
/// Returns an error if the report template fails to render.
pub fn render_inspect(definition: &GatewayDefinition) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("inspect", INSPECT_TEMPLATE)
        .context("Failed to load inspect template")?;
    let template = env
        .get_template("inspect")
        .context("Inspect template missing")?;

    let routes: Vec<RouteRow<'_>> = definition
        .routes
        .routes()
        .map(|r| RouteRow {
            method: r.method.as_str(),
            path: &r.path,
            status: r.status.as_u16(),
            cors: r.has_cors(),
            dynamic: r.origin_template.is_some(),
            authorizer: r.authorizer.as_ref().map(|a| a.name.as_str()),
        })
        .collect();

    let gateway_responses: Vec<GatewayRow> = definition
        .gateway_responses
        .iter()
        .map(|g| GatewayRow {
            kind: format!("{:?}", g.response_type),
            status: g.status_code.as_u16(),
            cors: !g.headers.is_empty(),
        })
        .collect();

    template
        .render(context! {
            api_name => &definition.api_name,
            stage_name => &definition.stage_name,
            origins => definition.allowed_origins.as_slice(),
            dynamic => definition.allowed_origins.len() > 1,
            routes => routes,
            gateway_responses => gateway_responses,
        })
        .context("Failed to render inspect report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackConfig;

    #[test]
    fn test_report_lists_every_route() {
        let config = StackConfig {
            allowed_origins: vec!["a.com".into(), "b.com".into()],
            ..StackConfig::default()
        };
        let def = GatewayDefinition::build(&config).unwrap();
        let report = render_inspect(&def).unwrap();

        assert!(report.contains("Allowed origins: a.com, b.com [dynamic]"));
        assert!(report.contains("/{proxy+}"));
        assert!(report.contains("404"));
        assert!(report.contains("+template"));
        assert!(report.contains("Unauthorized -> 403 (cors)"));
        assert_eq!(report.matches("OPTIONS").count(), 2);
    }
}
