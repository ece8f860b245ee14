//! Router core module - build phase and hot path for request routing.
//!
//! [`RouterBuilder`] is the only way to add routes; [`RouterBuilder::seal`]
//! consumes it and returns an immutable [`Router`]. Lookups take `&self` and
//! never mutate, so a sealed router can be shared across threads without
//! locking.
//!
//! # Allocation discipline
//!
//! Lookup does not allocate for paths up to 16 segments with up to
//! [`MAX_INLINE_PARAMS`] captures: parameter names are borrowed from the
//! sealed table and values from the request path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::error::RegisterError;
use super::matcher::{self, Found, PathSegments};
use super::radix::{CompiledRoute, RouteTable};
use crate::runtime_config::RuntimeConfig;

/// Maximum number of captures stored inline before spilling to the heap.
/// Most route patterns have four parameters or fewer.
pub const MAX_INLINE_PARAMS: usize = 8;

/// `(name, raw value)` pairs in left-to-right pattern order
///
/// Names borrow from the sealed router (`'r`), values from the request path
/// (`'p`).
pub type ParamVec<'r, 'p> = SmallVec<[(&'r str, &'p str); MAX_INLINE_PARAMS]>;

/// Settings fixed when the builder is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    /// Compare HTTP methods byte-for-byte. When false, methods are upper-cased
    /// at registration and lookup.
    pub case_sensitive: bool,
    /// Lookups slower than this are logged at `WARN`
    pub slow_lookup_threshold: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self::from(&RuntimeConfig::default())
    }
}

impl From<&RuntimeConfig> for RouterOptions {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
            slow_lookup_threshold: config.slow_lookup,
        }
    }
}

/// A successful lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'r, 'p, T> {
    /// The matched route as registered
    pub route: &'r CompiledRoute<T>,
    /// Captured parameters; static segments contribute nothing
    pub params: ParamVec<'r, 'p>,
}

impl<'r, 'p, T> RouteMatch<'r, 'p, T> {
    /// Identifier supplied at registration
    #[inline]
    #[must_use]
    pub fn route_id(&self) -> &'r T {
        self.route.route_id()
    }

    /// Get a captured parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&'p str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| *v)
    }

    /// Convert params to a HashMap
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    /// Detach the match from the router and the request path
    #[must_use]
    pub fn to_owned_match(&self) -> OwnedRouteMatch<T>
    where
        T: Clone,
    {
        OwnedRouteMatch {
            route_id: self.route_id().clone(),
            pattern: self.route.pattern().to_owned(),
            params: self
                .params
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }
}

/// [`RouteMatch`] with every borrow turned into an owned value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRouteMatch<T> {
    pub route_id: T,
    pub pattern: String,
    pub params: Vec<(String, String)>,
}

/// Outcome of [`Router::lookup`]
///
/// `NoMatch` is an expected result (answer with 404), not an error.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum LookupResult<'r, 'p, T> {
    Matched(RouteMatch<'r, 'p, T>),
    NoMatch,
}

impl<'r, 'p, T> LookupResult<'r, 'p, T> {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, LookupResult::Matched(_))
    }

    #[must_use]
    pub fn route_id(&self) -> Option<&'r T> {
        match self {
            LookupResult::Matched(m) => Some(m.route_id()),
            LookupResult::NoMatch => None,
        }
    }

    /// Captures of a match, empty for `NoMatch`
    #[must_use]
    pub fn params(&self) -> &[(&'r str, &'p str)] {
        match self {
            LookupResult::Matched(m) => m.params.as_slice(),
            LookupResult::NoMatch => &[],
        }
    }

    #[must_use]
    pub fn into_match(self) -> Option<RouteMatch<'r, 'p, T>> {
        match self {
            LookupResult::Matched(m) => Some(m),
            LookupResult::NoMatch => None,
        }
    }
}

fn normalize_method(method: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive || !method.bytes().any(|b| b.is_ascii_lowercase()) {
        Cow::Borrowed(method)
    } else {
        Cow::Owned(method.to_ascii_uppercase())
    }
}

/// Collects routes; the only place a route table can be modified
///
/// # Example
///
/// ```rust
/// use brrtmatch::router::{LookupResult, RouterBuilder};
///
/// let mut builder = RouterBuilder::new();
/// builder
///     .register("GET", None, "/users/:id:int", 1)?
///     .register("GET", None, "/users/me", 2)?;
/// let router = builder.seal();
///
/// let found = router.lookup("GET", None, "/users/42");
/// assert_eq!(found.route_id(), Some(&1));
/// assert_eq!(found.params(), &[("id", "42")]);
/// assert_eq!(router.lookup("GET", None, "/users/abc"), LookupResult::NoMatch);
/// # Ok::<(), brrtmatch::router::RegisterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RouterBuilder<T> {
    table: RouteTable<T>,
    options: RouterOptions,
}

impl<T> Default for RouterBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouterBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    #[must_use]
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            table: RouteTable::default(),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> RouterOptions {
        self.options
    }

    /// Number of routes registered so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.routes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.routes().is_empty()
    }

    /// Freeze the table
    #[must_use]
    pub fn seal(self) -> Router<T> {
        let routes_summary: Vec<String> = self
            .table
            .routes()
            .iter()
            .take(10)
            .map(|route| match route.host() {
                Some(host) => format!("{} {}{}", route.method(), host, route.pattern()),
                None => format!("{} {}", route.method(), route.pattern()),
            })
            .collect();

        info!(
            routes_count = self.table.routes().len(),
            routes_summary = ?routes_summary,
            case_sensitive = self.options.case_sensitive,
            routing_algorithm = "segment_trie",
            "Routing table sealed"
        );

        Router {
            table: self.table,
            options: self.options,
        }
    }
}

impl<T: fmt::Debug> RouterBuilder<T> {
    /// Register a route
    ///
    /// `host: None` registers the route for any host. The pattern is compiled
    /// immediately; see [`crate::router::compile`] for the syntax.
    ///
    /// # Errors
    ///
    /// - [`RegisterError::Parse`] if the pattern does not compile
    /// - [`RegisterError::Conflict`] if a structurally identical route already
    ///   exists for this method and host; the existing route is kept
    /// - [`RegisterError::EmptyMethod`] if `method` is empty
    pub fn register(
        &mut self,
        method: &str,
        host: Option<&str>,
        pattern: &str,
        route_id: T,
    ) -> Result<&mut Self, RegisterError> {
        if method.is_empty() {
            return Err(RegisterError::EmptyMethod {
                pattern: pattern.to_owned(),
            });
        }

        let method = normalize_method(method, self.options.case_sensitive).into_owned();
        debug!(
            method = %method,
            host = ?host,
            pattern = %pattern,
            route_id = ?route_id,
            "Registering route"
        );
        self.table
            .insert(method, host.map(str::to_owned), pattern, route_id)?;
        Ok(self)
    }

    /// Register a batch of `(method, host, pattern, route_id)` tuples,
    /// stopping at the first error
    ///
    /// # Errors
    ///
    /// The first error [`RouterBuilder::register`] returns.
    pub fn extend<I, M, H, P>(&mut self, routes: I) -> Result<&mut Self, RegisterError>
    where
        I: IntoIterator<Item = (M, Option<H>, P, T)>,
        M: AsRef<str>,
        H: AsRef<str>,
        P: AsRef<str>,
    {
        for (method, host, pattern, route_id) in routes {
            self.register(
                method.as_ref(),
                host.as_ref().map(|host| host.as_ref()),
                pattern.as_ref(),
                route_id,
            )?;
        }
        Ok(self)
    }
}

/// Sealed route table
///
/// Immutable once built. To change routes while serving, build a new router
/// and swap it in (see [`crate::hot_reload::SharedRouter`]).
#[derive(Debug, Clone)]
pub struct Router<T> {
    table: RouteTable<T>,
    options: RouterOptions,
}

impl<T> Router<T> {
    #[must_use]
    pub fn builder() -> RouterBuilder<T> {
        RouterBuilder::new()
    }

    #[must_use]
    pub fn options(&self) -> RouterOptions {
        self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.routes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.routes().is_empty()
    }

    /// Registered routes in registration order
    pub fn routes(&self) -> impl ExactSizeIterator<Item = &CompiledRoute<T>> + '_ {
        self.table.routes().iter()
    }

    /// Resolve a request
    ///
    /// Routes bound to `host` are tried first, then routes registered for any
    /// host. A request without a host only sees any-host routes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use brrtmatch::router::Router;
    ///
    /// let mut builder = Router::builder();
    /// builder.register("GET", None, "/files/*rest", "files")?;
    /// let router = builder.seal();
    ///
    /// let found = router.lookup("GET", Some("cdn.example.com"), "/files/a/b/c");
    /// assert_eq!(found.params(), &[("rest", "a/b/c")]);
    /// # Ok::<(), brrtmatch::router::RegisterError>(())
    /// ```
    pub fn lookup<'r, 'p>(
        &'r self,
        method: &str,
        host: Option<&str>,
        path: &'p str,
    ) -> LookupResult<'r, 'p, T> {
        let match_start = Instant::now();
        let result = self.find(method, host, path);
        let match_duration = match_start.elapsed();

        match &result {
            LookupResult::Matched(m) => {
                if match_duration > self.options.slow_lookup_threshold {
                    warn!(
                        method = %method,
                        host = ?host,
                        path = %path,
                        route_pattern = %m.route.pattern(),
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    debug!(
                        method = %method,
                        host = ?host,
                        path = %path,
                        route_pattern = %m.route.pattern(),
                        path_params = ?m.params,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
            }
            LookupResult::NoMatch => {
                debug!(
                    method = %method,
                    host = ?host,
                    path = %path,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
            }
        }

        result
    }

    /// Resolve an [`http::Request`]
    ///
    /// The host comes from the URI authority, falling back to the `Host`
    /// header, with any port removed. The query string is not part of the
    /// path.
    pub fn match_request<'r, 'p, B>(
        &'r self,
        request: &'p http::Request<B>,
    ) -> LookupResult<'r, 'p, T> {
        let host = request.uri().host().or_else(|| {
            request
                .headers()
                .get(http::header::HOST)
                .and_then(|value| value.to_str().ok())
                .map(strip_port)
        });
        self.lookup(request.method().as_str(), host, request.uri().path())
    }

    fn find<'r, 'p>(
        &'r self,
        method: &str,
        host: Option<&str>,
        path: &'p str,
    ) -> LookupResult<'r, 'p, T> {
        let method = normalize_method(method, self.options.case_sensitive);
        let Some(bucket) = self.table.bucket(&method) else {
            return LookupResult::NoMatch;
        };

        let segments = PathSegments::new(path);
        let found = host
            .and_then(|host| bucket.hosts.get(host))
            .and_then(|root| matcher::walk(root, &segments))
            .or_else(|| matcher::walk(&bucket.any_host, &segments));

        match found {
            Some(found) => LookupResult::Matched(self.bind(found)),
            None => LookupResult::NoMatch,
        }
    }

    fn bind<'r, 'p>(&'r self, found: Found<'p>) -> RouteMatch<'r, 'p, T> {
        let route = self.table.route(found.route);
        let params = route.param_names().zip(found.captures).collect();
        RouteMatch { route, params }
    }
}

fn strip_port(authority: &str) -> &str {
    if let Some(rest) = authority.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &authority[..end + 2],
            None => authority,
        };
    }
    authority
        .split_once(':')
        .map_or(authority, |(host, _port)| host)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_normalize_method() {
        assert_eq!(normalize_method("get", true), "get");
        assert_eq!(normalize_method("get", false), "GET");
        assert!(matches!(normalize_method("GET", false), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("example.com:8080"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
    }
}
