//! # brrtmatch
//!
//! **brrtmatch** resolves an incoming request (method, optional host, path)
//! to the identifier of the most specific registered route and extracts the
//! path parameters, without heap allocation for ordinary paths.
//!
//! ## Overview
//!
//! Route patterns are written as path templates:
//!
//! | Segment | Matches |
//! |---------|---------|
//! | `users` | exactly `users` |
//! | `:id` | any non-empty segment |
//! | `:id:int` | optional `-` followed by digits |
//! | `:x:float` | decimal number such as `-1.5` or `.5` |
//! | `*rest` | the remaining path, last segment only |
//!
//! When several routes could match, a static segment beats an `int`
//! parameter, which beats a `float` parameter, which beats an untyped
//! parameter, which beats a wildcard. The walk backtracks when a more
//! specific branch dead-ends, so the result never depends on registration
//! order.
//!
//! ## Architecture
//!
//! - **[`router`]** - pattern compiler, segment trie, matcher and the
//!   [`RouterBuilder`] / [`Router`] pair
//! - **[`config`]** - route tables loaded from YAML, JSON or TOML files
//! - **[`hot_reload`]** - rebuild and atomically swap a shared router when a
//!   table file changes
//! - **[`runtime_config`]** - environment knobs for router construction
//! - **[`otel`]** - structured logging setup
//! - **[`cli`]** - the `brrtmatch` command-line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtmatch::RouterBuilder;
//!
//! # fn main() -> Result<(), brrtmatch::router::RegisterError> {
//! let mut builder = RouterBuilder::new();
//! builder.register("GET", None, "/users/:id:int", "get_user")?;
//! builder.register("GET", None, "/users/me", "get_me")?;
//! let router = builder.seal();
//!
//! let found = router.lookup("GET", None, "/users/42");
//! assert_eq!(found.route_id(), Some(&"get_user"));
//! assert_eq!(found.params(), &[("id", "42")]);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod hot_reload;
pub mod otel;
pub mod router;
pub mod runtime_config;

pub use config::{load_route_table, load_router, RouteEntry, RouteTableConfig};
pub use hot_reload::SharedRouter;
pub use router::{LookupResult, RouteMatch, Router, RouterBuilder, RouterOptions};
