//! Segment trie backing the route table
//!
//! The table is keyed first by HTTP method, then by host (one bucket per exact
//! host plus a single "any host" bucket), then by path segment. Every node can
//! hold:
//!
//! - static children, keyed by their exact text
//! - at most one parameter child per [`Constraint`]
//! - a wildcard slot (wildcards are always terminal, so it is just a route)
//! - a terminal route
//!
//! Parameter names do not take part in the structure. `/users/:id` and
//! `/users/:uid/posts` share the same `String` child; each terminal route
//! carries its own names and the matcher zips them with the captured values
//! once a route is found.
//!
//! ## Conflicts
//!
//! Inserting a route whose terminal slot is already taken is rejected with
//! [`ConflictError::DuplicateRoute`]. Patterns that are only ambiguous at
//! lookup time (`:id:int` next to `:id`) are accepted; the matcher's priority
//! order resolves them.

use std::collections::HashMap;
use std::fmt;

use super::error::{ConflictError, RegisterError};
use super::pattern::{self, Constraint, Segment};

/// A route as stored in the table
///
/// Created once by `RouterBuilder::register` and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRoute<T> {
    method: String,
    host: Option<String>,
    pattern: String,
    segments: Vec<Segment>,
    route_id: T,
}

impl<T> CompiledRoute<T> {
    /// Method as stored (upper-cased when the router is case-insensitive)
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Host this route is bound to, `None` for any host
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Pattern text as registered
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn route_id(&self) -> &T {
        &self.route_id
    }

    /// Capture names in left-to-right pattern order
    pub fn param_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(Segment::param_name)
    }
}

/// Trie node
///
/// Routes are referenced by their index in [`RouteTable::routes`].
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub(crate) statics: HashMap<String, Node>,
    /// Indexed by [`Constraint::index`]
    pub(crate) params: [Option<Box<Node>>; 3],
    pub(crate) wildcard: Option<usize>,
    pub(crate) route: Option<usize>,
}

impl Node {
    pub(crate) fn param_child(&self, constraint: Constraint) -> Option<&Node> {
        self.params[constraint.index()].as_deref()
    }
}

/// Host buckets for one method
#[derive(Debug, Clone, Default)]
pub(crate) struct MethodBucket {
    pub(crate) hosts: HashMap<String, Node>,
    pub(crate) any_host: Node,
}

/// Owns every route and the trie indexing them
#[derive(Debug, Clone)]
pub(crate) struct RouteTable<T> {
    methods: HashMap<String, MethodBucket>,
    routes: Vec<CompiledRoute<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self {
            methods: HashMap::new(),
            routes: Vec::new(),
        }
    }
}

impl<T> RouteTable<T> {
    pub(crate) fn bucket(&self, method: &str) -> Option<&MethodBucket> {
        self.methods.get(method)
    }

    pub(crate) fn route(&self, index: usize) -> &CompiledRoute<T> {
        &self.routes[index]
    }

    pub(crate) fn routes(&self) -> &[CompiledRoute<T>] {
        &self.routes
    }

    /// Compile `pattern` and insert it
    ///
    /// `method` must already be normalised by the caller. Nothing is modified
    /// when an error is returned, apart from empty intermediate nodes that a
    /// conflicting insert may have created along an existing path.
    pub(crate) fn insert(
        &mut self,
        method: String,
        host: Option<String>,
        pattern: &str,
        route_id: T,
    ) -> Result<usize, RegisterError>
    where
        T: fmt::Debug,
    {
        let segments = pattern::compile(pattern)?.into_segments();

        let bucket = self.methods.entry(method.clone()).or_default();
        let mut node = match &host {
            Some(host) => bucket.hosts.entry(host.clone()).or_default(),
            None => &mut bucket.any_host,
        };

        let mut terminal_wildcard = false;
        for segment in &segments {
            match segment {
                Segment::Static(text) => {
                    node = node.statics.entry(text.clone()).or_default();
                }
                Segment::Param { constraint, .. } => {
                    node = &mut **node.params[constraint.index()].get_or_insert_with(Box::default);
                }
                Segment::Wildcard { .. } => terminal_wildcard = true,
            }
        }

        let slot = if terminal_wildcard {
            &mut node.wildcard
        } else {
            &mut node.route
        };

        if let Some(existing) = *slot {
            let existing = &self.routes[existing];
            return Err(ConflictError::DuplicateRoute {
                method,
                host,
                pattern: pattern.to_owned(),
                existing_pattern: existing.pattern.clone(),
                existing: format!("{:?}", existing.route_id),
                incoming: format!("{route_id:?}"),
            }
            .into());
        }

        let index = self.routes.len();
        *slot = Some(index);
        self.routes.push(CompiledRoute {
            method,
            host,
            pattern: pattern.to_owned(),
            segments,
            route_id,
        });
        Ok(index)
    }
}
