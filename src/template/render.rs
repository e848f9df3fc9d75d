//! Template dialects.

use super::{Expr, Layout, OriginTemplate, Stmt};

/// Target syntax for an [`OriginTemplate`]
pub trait TemplateDialect {
    /// Render a full template
    fn render(&self, template: &OriginTemplate) -> String;
}

/// Apache Velocity, as understood by the gateway's mapping templates
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity;

const INDENT: &str = "  ";

impl Velocity {
    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::RequestHeader(name) => format!("$input.params().header.get(\"{}\")", name),
            Expr::Var(name) => format!("${}", name),
            Expr::Str(value) => format!("\"{}\"", value),
            Expr::Eq(lhs, rhs) => format!("{} == {}", self.expr(lhs), self.expr(rhs)),
            Expr::EndsWith { subject, suffix } => {
                format!("{}.endsWith(\"{}\")", self.expr(subject), suffix)
            }
            Expr::Or(terms) => terms
                .iter()
                .map(|t| self.expr(t))
                .collect::<Vec<_>>()
                .join(" || "),
        }
    }

    fn stmt(&self, stmt: &Stmt, depth: usize, out: &mut Vec<String>) {
        let pad = INDENT.repeat(depth);
        match stmt {
            Stmt::Set { var, value } => {
                out.push(format!("{}#set(${} = {})", pad, var, self.expr(value)));
            }
            Stmt::OverrideHeader { name, value } => {
                out.push(format!(
                    "{}#set($context.responseOverride.header.{} = {})",
                    pad,
                    name,
                    self.expr(value)
                ));
            }
            Stmt::If {
                condition,
                body,
                layout: Layout::Inline,
            } => {
                let mut inner = Vec::new();
                for s in body {
                    self.stmt(s, 0, &mut inner);
                }
                let mut line = format!("{}#if({})", pad, self.expr(condition));
                for s in inner {
                    line.push(' ');
                    line.push_str(&s);
                }
                line.push_str(" #end");
                out.push(line);
            }
            Stmt::If {
                condition,
                body,
                layout: Layout::Block,
            } => {
                out.push(format!("{}#if({})", pad, self.expr(condition)));
                for s in body {
                    self.stmt(s, depth + 1, out);
                }
                out.push(format!("{}#end", pad));
            }
        }
    }
}

impl TemplateDialect for Velocity {
    fn render(&self, template: &OriginTemplate) -> String {
        let mut lines = Vec::new();
        for stmt in template.statements() {
            self.stmt(stmt, 0, &mut lines);
        }
        lines.join("\n")
    }
}
