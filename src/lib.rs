//! # mockgate
//!
//! **mockgate** builds the configuration of a mocked HTTP API for a managed
//! API gateway: CORS-aware success routes, preflight answers, a 404
//! catch-all, authorizer wiring, and error responses that browsers can read.
//!
//! ## Overview
//!
//! Every route returns a fixed JSON body computed by the gateway itself;
//! no backend runs. The interesting part is CORS: the response must carry an
//! `Access-Control-Allow-Origin` a browser accepts. A single configured
//! origin is sent as a static header. With several, the static header holds
//! the first one and an origin template, executed by the gateway per
//! request, echoes the caller's `Origin` back when it ends with any of the
//! allowed origins.
//!
//! ## Architecture
//!
//! - **[`cors`]** - Origin allow-list, static CORS header values
//! - **[`template`]** - Origin template AST, Velocity rendering, evaluation
//! - **[`route`]** - Route specs and the builder for mocked responses
//! - **[`router`]** - Route registration and request resolution
//! - **[`authorizer`]** - Authorizer handles, bindings and gateway responses
//! - **[`stack`]** - Assembles a complete [`GatewayDefinition`]
//! - **[`gateway`]** - In-process host emulator for a definition
//! - **[`config`]** - YAML stack configuration with environment overrides
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `mockgate` command
//!
//! ### Build Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(mockgate)
//!     participant Config as config::StackConfig
//!     participant Stack as stack::GatewayDefinition
//!     participant Registrar as router::RouteRegistrar
//!     participant Builder as route::RouteResponseBuilder
//!
//!     User->>CLI: mockgate synth --config stack.yaml
//!     CLI->>Config: load("stack.yaml")
//!     Config-->>CLI: StackConfig (env overrides applied)
//!     CLI->>Stack: build(&config)
//!     Stack->>Registrar: add_mocked_method / add_preflight
//!     Registrar->>Builder: success(&origins).build(method, path)
//!     Builder-->>Registrar: RouteSpec
//!     Stack->>Registrar: add_not_found_handler()
//!     Registrar-->>Stack: RouteTable
//!     Stack-->>CLI: GatewayDefinition
//!     CLI-->>User: JSON / YAML
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use mockgate::{GatewayDefinition, MockGateway, MockRequest, StackConfig};
//!
//! let config = StackConfig {
//!     allowed_origins: vec!["a.com".into(), "b.com".into()],
//!     ..StackConfig::default()
//! };
//! let definition = GatewayDefinition::build(&config)?;
//! let gateway = MockGateway::new(definition);
//!
//! let response = gateway.handle(
//!     &MockRequest::new(Method::GET, "/").header("Origin", "https://sub.b.com"),
//! )?;
//! assert_eq!(response.status, 200);
//! assert_eq!(
//!     response.header("Access-Control-Allow-Origin"),
//!     Some("https://sub.b.com")
//! );
//! # Ok::<(), mockgate::ConfigError>(())
//! ```

pub mod authorizer;
pub mod cli;
pub mod config;
pub mod cors;
pub mod error;
pub mod gateway;
pub mod headers;
pub mod logging;
pub mod report;
pub mod route;
pub mod router;
pub mod stack;
pub mod template;

pub use authorizer::{
    AuthDecision, AuthFailure, AuthorizerBinding, AuthorizerRef, GatewayResponse,
    RequestAuthorizer, ResponseType,
};
pub use config::{AuthorizerConfig, StackConfig};
pub use cors::{AllowedOrigins, CorsHeaders, OriginPolicy, OriginValue};
pub use error::ConfigError;
pub use gateway::{MockGateway, MockRequest, MockResponse};
pub use route::{MethodSelector, PassthroughBehavior, RouteResponseBuilder, RouteSpec};
pub use router::{RouteRegistrar, RouteTable};
pub use stack::GatewayDefinition;
pub use template::OriginTemplate;
