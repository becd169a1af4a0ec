//! Route groups and the ordered binding table.
//!
//! # Responsibilities
//! - Store route groups with their handlers
//! - Keep bindings in registration order
//! - Yield every binding that claims a request, first registered first
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc` without locks)
//! - Registration order is precedence; bindings are never re-sorted
//! - Group-local lookup is O(path-length) via `matchit`
//! - HEAD falls back to the group's GET handler
//! - Path parameters reach handlers percent-decoded

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::routing::handler::{BoxedHandler, Handler};
use crate::routing::matcher::MountMatcher;

/// A named set of routes mounted as one unit.
pub struct RouteGroup {
    name: String,
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    listing: Vec<(Method, String)>,
}

impl RouteGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: HashMap::new(),
            listing: Vec::new(),
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Paths are relative to the group's mount point and use `matchit`
    /// syntax: `/{id}` captures a segment, `/{*rest}` the remainder.
    ///
    /// # Panics
    ///
    /// Panics if the path is invalid or already registered for `method`
    /// in this group. Groups are built once at startup.
    pub fn route(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let path = normalize(path);
        self.routes
            .entry(method.clone())
            .or_default()
            .insert(path.clone(), handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}` in group `{}`: {e}", self.name));
        self.listing.push((method, path));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.route(Method::DELETE, path, handler)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(method, path)` pairs in registration order.
    pub fn listing(&self) -> &[(Method, String)] {
        &self.listing
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let path = normalize(path);
        self.lookup_exact(method, &path).or_else(|| {
            if *method == Method::HEAD {
                self.lookup_exact(&Method::GET, &path)
            } else {
                None
            }
        })
    }

    fn lookup_exact(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let mut params = HashMap::new();
        for (key, raw) in matched.params.iter() {
            // A segment that does not decode to UTF-8 cannot match.
            let value = percent_decode_str(raw).decode_utf8().ok()?;
            params.insert(key.to_owned(), value.into_owned());
        }
        Some((handler, params))
    }
}

impl std::fmt::Debug for RouteGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGroup")
            .field("name", &self.name)
            .field("routes", &self.listing)
            .finish()
    }
}

/// Strip a trailing slash so `/list/` and `/list` match the same route.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// A route group together with its mount point.
#[derive(Debug, Clone)]
pub struct RouteBinding {
    pub matcher: MountMatcher,
    pub group: Arc<RouteGroup>,
}

/// Serializable view of one binding, for inspection endpoints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BindingInfo {
    pub position: usize,
    pub mount: String,
    pub group: String,
    pub routes: Vec<String>,
}

/// A binding that accepted a request, with the handler that will run.
pub struct RouteMatch<'a> {
    pub binding: &'a RouteBinding,
    pub handler: BoxedHandler,
    pub params: HashMap<String, String>,
    pub relative_path: String,
}

/// Ordered list of route bindings. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `group` under `prefix`. Returns `self` for chaining.
    pub fn mount(mut self, prefix: &str, group: RouteGroup) -> Self {
        self.bindings.push(RouteBinding {
            matcher: MountMatcher::new(prefix),
            group: Arc::new(group),
        });
        self
    }

    /// Append `group` without a prefix: it competes for every path.
    pub fn merge(self, group: RouteGroup) -> Self {
        self.mount("/", group)
    }

    /// Bindings in precedence order.
    pub fn bindings(&self) -> &[RouteBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn describe(&self) -> Vec<BindingInfo> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(position, binding)| BindingInfo {
                position,
                mount: binding.matcher.to_string(),
                group: binding.group.name().to_string(),
                routes: binding
                    .group
                    .listing()
                    .iter()
                    .map(|(method, path)| format!("{method} {path}"))
                    .collect(),
            })
            .collect()
    }

    /// Every binding that has a route for `method` and `path`, lazily and
    /// in registration order.
    pub fn candidates<'a>(
        &'a self,
        method: &'a Method,
        path: &'a str,
    ) -> impl Iterator<Item = RouteMatch<'a>> + 'a {
        self.bindings.iter().filter_map(move |binding| {
            let relative = binding.matcher.strip(path)?;
            let (handler, params) = binding.group.lookup(method, relative)?;
            Some(RouteMatch {
                binding,
                handler,
                params,
                relative_path: relative.to_string(),
            })
        })
    }
}
