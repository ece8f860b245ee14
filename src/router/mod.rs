//! # Router Module
//!
//! Path matching and route resolution for brrtmatch.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route patterns (`/users/:id:int`, `/files/*rest`) into segments
//! - Building a segment trie keyed by method and host
//! - Rejecting duplicate registrations at build time
//! - Matching requests with a fixed priority order and extracting parameters
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Build**: a [`RouterBuilder`] compiles and inserts routes. Errors are
//!    returned immediately and the builder keeps every route registered before
//!    the failure.
//!
//! 2. **Lookup**: [`RouterBuilder::seal`] produces a [`Router`] that can only
//!    be read. [`Router::lookup`] walks the trie trying, at every segment, a
//!    static child, then `int`, `float` and untyped parameters, then a
//!    wildcard, backtracking on dead ends. The most specific route wins no
//!    matter the registration order.
//!
//! ## Example
//!
//! ```rust
//! use brrtmatch::router::{Router, RouterBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = RouterBuilder::new();
//! builder.register("GET", None, "/users/:id:int", "get_user")?;
//! builder.register("GET", Some("api.example.com"), "/health", "api_health")?;
//! let router: Router<&str> = builder.seal();
//!
//! if let Some(m) = router.lookup("GET", None, "/users/123").into_match() {
//!     println!("Route: {}", m.route_id());
//!     println!("Path params: {:?}", m.params);
//! }
//! assert!(!router.lookup("GET", None, "/health").is_match());
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance
//!
//! - Lookup cost is bounded by path length times trie depth, independent of
//!   the number of routes
//! - No allocation for common paths (see [`MAX_INLINE_PARAMS`])
//! - No recursion: backtracking uses an explicit frame stack

mod core;
mod error;
mod matcher;
mod pattern;
mod radix;

pub use core::{
    LookupResult, OwnedRouteMatch, ParamVec, RouteMatch, Router, RouterBuilder, RouterOptions,
    MAX_INLINE_PARAMS,
};
pub use error::{ConflictError, ParseError, RegisterError};
pub use pattern::{compile, split_segments, CompiledSegments, Constraint, Segment};
pub use radix::CompiledRoute;
