//! # Router Module
//!
//! Registers mocked routes and resolves incoming requests against them.
//!
//! ## Overview
//!
//! [`RouteRegistrar`] collects [`crate::route::RouteSpec`]s under a base
//! resource: the application method(s) at the root, optional `OPTIONS`
//! preflight answers, and the catch-all `ANY /{proxy+}` returning 404.
//! [`RouteTable`] is the finished, immutable result.
//!
//! ## Resolution
//!
//! The hosting runtime picks the most specific resource for a request, and
//! [`RouteTable::resolve`] replicates that precedence:
//!
//! 1. More literal segments win (`/items/special` over `/items/{id}`)
//! 2. Then more `{param}` segments
//! 3. A greedy `{proxy+}` resource loses to any non-greedy match
//! 4. On the same path, an exact method beats `ANY`
//!
//! The catch-all therefore never shadows an explicitly registered route, and
//! any request matching nothing at all (for example `POST /` when only
//! `GET /` is registered) resolves to the fallback.

mod core;
mod registrar;

#[cfg(test)]
mod tests;

pub use core::{PathPattern, RouteTable, Segment};
pub use registrar::{RouteRegistrar, PROXY_RESOURCE};
