//! # Origin Template
//!
//! When a route allows more than one origin, the static
//! `Access-Control-Allow-Origin` header can only name one of them. The origin
//! template is a short program, executed by the hosting runtime before the
//! response body is rendered, that reflects the caller's `Origin` back when it
//! matches one of the allowed entries.
//!
//! The program is modelled as a small AST ([`Stmt`], [`Expr`]) so the matching
//! logic stays independent of the host's template syntax. [`render`] turns it
//! into text for a particular [`render::TemplateDialect`]; [`eval`] runs it
//! directly against a set of request headers.
//!
//! ## Matching semantics
//!
//! - The `Origin` header is read first; if absent or empty the lower-case
//!   `origin` header is tried. Header names are looked up case-sensitively
//!   because the host does not normalise them.
//! - An allowed entry matches when the request origin **ends with** it.
//!   `example.com` therefore admits `https://api.example.com` as well.
//! - On a match the response header is overridden with the exact request
//!   origin. Otherwise the static header stays and the browser rejects the
//!   response.

pub mod eval;
pub mod render;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::cors::AllowedOrigins;
use crate::headers::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};

pub use eval::ResponseOverrides;
pub use render::{TemplateDialect, Velocity};

/// Variable holding the resolved request origin
pub const ORIGIN_VAR: &str = "origin";

/// Template expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Value of a request header, or null when absent
    RequestHeader(String),
    /// Value of a template variable
    Var(String),
    /// String literal
    Str(String),
    /// String equality
    Eq(Box<Expr>, Box<Expr>),
    /// `subject` ends with `suffix`
    EndsWith {
        subject: Box<Expr>,
        suffix: String,
    },
    /// Logical OR of all operands
    Or(Vec<Expr>),
}

/// How a conditional is laid out when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `#if(cond) body #end` on one line
    Inline,
    /// Condition, indented body and `#end` on separate lines
    Block,
}

/// Template statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Assign a variable
    Set { var: String, value: Expr },
    /// Run `body` when `condition` holds
    If {
        condition: Expr,
        body: Vec<Stmt>,
        layout: Layout,
    },
    /// Override an outgoing response header
    OverrideHeader { name: String, value: Expr },
}

/// A correctly nested sequence of template statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginTemplate {
    statements: Vec<Stmt>,
}

impl OriginTemplate {
    #[must_use]
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    #[must_use]
    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    /// Render with the given dialect
    #[must_use]
    pub fn render<D: TemplateDialect + ?Sized>(&self, dialect: &D) -> String {
        dialect.render(self)
    }

    /// Render in the hosting runtime's native dialect
    #[must_use]
    pub fn to_velocity(&self) -> String {
        self.render(&Velocity)
    }
}

impl Serialize for OriginTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_velocity())
    }
}

/// Build the origin-matching template for `origins`
///
/// Returns `None` for a single allowed origin, where the static header is
/// already correct.
#[must_use]
pub fn generate(origins: &AllowedOrigins) -> Option<OriginTemplate> {
    if origins.len() <= 1 {
        return None;
    }

    let origin = || Expr::Var(ORIGIN_VAR.to_string());

    let read_origin = Stmt::Set {
        var: ORIGIN_VAR.to_string(),
        value: Expr::RequestHeader(ORIGIN.to_string()),
    };

    let fallback_lowercase = Stmt::If {
        condition: Expr::Eq(Box::new(origin()), Box::new(Expr::Str(String::new()))),
        body: vec![Stmt::Set {
            var: ORIGIN_VAR.to_string(),
            value: Expr::RequestHeader(ORIGIN.to_ascii_lowercase()),
        }],
        layout: Layout::Inline,
    };

    let matches_any = Expr::Or(
        origins
            .as_slice()
            .iter()
            .map(|allowed| Expr::EndsWith {
                subject: Box::new(origin()),
                suffix: allowed.clone(),
            })
            .collect(),
    );

    let reflect = Stmt::If {
        condition: matches_any,
        body: vec![Stmt::OverrideHeader {
            name: ACCESS_CONTROL_ALLOW_ORIGIN.to_string(),
            value: origin(),
        }],
        layout: Layout::Block,
    };

    debug!(origins = origins.len(), "Generated origin template");
    Some(OriginTemplate::new(vec![
        read_origin,
        fallback_lowercase,
        reflect,
    ]))
}
