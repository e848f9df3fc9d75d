//! Reference interpreter for origin templates.
//!
//! Executes the AST the way the hosting runtime executes the rendered
//! template, so routing and CORS behavior can be checked without deploying.

use std::collections::{BTreeMap, HashMap};

use super::{Expr, OriginTemplate, Stmt};

/// Response headers set by a template run, keyed by header name
pub type ResponseOverrides = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Null,
    Str(String),
    Bool(bool),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Str(_) => true,
            Value::Bool(b) => *b,
        }
    }

    // Absent headers compare equal to the empty string
    fn as_text(&self) -> &str {
        match self {
            Value::Null => "",
            Value::Str(s) => s,
            Value::Bool(true) => "true",
            Value::Bool(false) => "false",
        }
    }
}

struct Scope<'a> {
    request_headers: &'a BTreeMap<String, String>,
    vars: HashMap<String, Value>,
    overrides: ResponseOverrides,
}

impl Scope<'_> {
    fn eval(&self, expr: &Expr) -> Value {
        match expr {
            Expr::RequestHeader(name) => self
                .request_headers
                .get(name)
                .map(|v| Value::Str(v.clone()))
                .unwrap_or(Value::Null),
            Expr::Var(name) => self.vars.get(name).cloned().unwrap_or(Value::Null),
            Expr::Str(s) => Value::Str(s.clone()),
            Expr::Eq(lhs, rhs) => Value::Bool(self.eval(lhs).as_text() == self.eval(rhs).as_text()),
            Expr::EndsWith { subject, suffix } => match self.eval(subject) {
                Value::Str(s) => Value::Bool(s.ends_with(suffix.as_str())),
                _ => Value::Bool(false),
            },
            Expr::Or(terms) => Value::Bool(terms.iter().any(|t| self.eval(t).truthy())),
        }
    }

    fn exec(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Set { var, value } => {
                let value = self.eval(value);
                self.vars.insert(var.clone(), value);
            }
            Stmt::If {
                condition, body, ..
            } => {
                if self.eval(condition).truthy() {
                    for s in body {
                        self.exec(s);
                    }
                }
            }
            Stmt::OverrideHeader { name, value } => {
                let value = self.eval(value).as_text().to_string();
                self.overrides.insert(name.clone(), value);
            }
        }
    }
}

impl OriginTemplate {
    /// Run the template against the request's headers
    ///
    /// Header names are matched case-sensitively. Returns the response
    /// headers the template overrides; an empty map means the static
    /// headers stand.
    #[must_use]
    pub fn evaluate(&self, request_headers: &BTreeMap<String, String>) -> ResponseOverrides {
        let mut scope = Scope {
            request_headers,
            vars: HashMap::new(),
            overrides: ResponseOverrides::new(),
        };
        for stmt in self.statements() {
            scope.exec(stmt);
        }
        scope.overrides
    }
}
