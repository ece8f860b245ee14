//! # CLI Module
//!
//! Command-line access to route table files.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Build the router and report the first rejected route:
//!
//! ```bash
//! brrtmatch check --table routes.yaml
//! ```
//!
//! ### `routes`
//!
//! Print every entry of a table in registration order:
//!
//! ```bash
//! brrtmatch routes --table routes.yaml
//! ```
//!
//! ### `lookup`
//!
//! Resolve a request and print the route identifier and captures:
//!
//! ```bash
//! brrtmatch lookup --table routes.yaml --host api.example.com GET /users/42
//! ```
//!
//! ### `watch`
//!
//! Keep a router built from the table and rebuild it on every change:
//!
//! ```bash
//! brrtmatch watch --table routes.yaml
//! ```
//!
//! Logging is configured through the `BRRTM_LOG_*` variables (see
//! [`crate::otel`]) and router behavior through [`crate::runtime_config`].

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
