//! Route table and request resolution.

use http::Method;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::route::{MethodSelector, RouteSpec};

/// One segment of a resource path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text (`items`)
    Literal(String),
    /// Single-segment variable (`{id}`)
    Param(String),
    /// Greedy variable consuming one or more segments (`{proxy+}`)
    Greedy(String),
}

/// Parsed resource path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

/// Ranking of a successful match; higher wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Specificity {
    literals: usize,
    params: usize,
    not_greedy: bool,
}

impl PathPattern {
    /// Parse a resource path such as `/users/{id}` or `/{proxy+}`
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments = split_path(path)
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                {
                    Some(name) => match name.strip_suffix('+') {
                        Some(greedy) => Segment::Greedy(greedy.to_string()),
                        None => Segment::Param(name.to_string()),
                    },
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn specificity(&self, request: &[&str]) -> Option<Specificity> {
        let mut spec = Specificity {
            literals: 0,
            params: 0,
            not_greedy: true,
        };
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Greedy(_) => {
                    // Must be last and swallow at least one segment
                    if i + 1 != self.segments.len() || request.len() <= i {
                        return None;
                    }
                    spec.not_greedy = false;
                    return Some(spec);
                }
                Segment::Literal(text) => {
                    if request.get(i) != Some(&text.as_str()) {
                        return None;
                    }
                    spec.literals += 1;
                }
                Segment::Param(_) => {
                    request.get(i)?;
                    spec.params += 1;
                }
            }
        }
        (request.len() == self.segments.len()).then_some(spec)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.split('/').filter(|s| !s.is_empty())
}

/// Assembled routes plus the catch-all fallback
///
/// Built by [`super::RouteRegistrar`]. Resolution is total: a request
/// matching nothing resolves to the fallback route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<(PathPattern, RouteSpec)>,
    fallback: usize,
}

impl RouteTable {
    pub(crate) fn new(routes: Vec<RouteSpec>, fallback: usize) -> Self {
        let routes: Vec<_> = routes
            .into_iter()
            .map(|spec| (PathPattern::parse(&spec.path), spec))
            .collect();

        let summary: Vec<String> = routes
            .iter()
            .map(|(_, spec)| format!("{} {}", spec.method, spec.path))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?summary,
            "Route table assembled"
        );

        Self { routes, fallback }
    }

    /// Routes in registration order
    pub fn routes(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.iter().map(|(_, spec)| spec)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The catch-all route
    #[must_use]
    pub fn fallback(&self) -> &RouteSpec {
        &self.routes[self.fallback].1
    }

    /// Look up the route registered for exactly `method` and `path`
    #[must_use]
    pub fn get(&self, method: &MethodSelector, path: &str) -> Option<&RouteSpec> {
        self.routes
            .iter()
            .map(|(_, spec)| spec)
            .find(|spec| &spec.method == method && spec.path == path)
    }

    /// Resolve a request to a route
    ///
    /// The most specific path wins (literal segment over `{param}` over
    /// `{proxy+}`); on equal paths an exact method beats `ANY`. Anything
    /// unmatched resolves to the fallback.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> &RouteSpec {
        let request: Vec<&str> = split_path(path).collect();

        let best = self
            .routes
            .iter()
            .filter(|(_, spec)| spec.method.matches(method))
            .filter_map(|(pattern, spec)| {
                let exact_method = matches!(spec.method, MethodSelector::Exact(_));
                pattern
                    .specificity(&request)
                    .map(|rank| ((rank, exact_method), spec))
            })
            // Earlier registration wins ties
            .max_by(|(a, _), (b, _)| a.cmp(b).then(Ordering::Greater));

        match best {
            Some((_, spec)) => {
                debug!(%method, path, route = %spec.path, "Route matched");
                spec
            }
            None => {
                warn!(%method, path, "No route matched, using fallback");
                self.fallback()
            }
        }
    }
}

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.routes())
    }
}
