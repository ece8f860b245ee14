//! # Hot Reload Module
//!
//! Live reloading of route table files without restarting the service.
//!
//! A sealed [`Router`] is never modified. Reloading builds a complete new
//! router from the file and swaps it into a [`SharedRouter`]; lookups running
//! at that moment finish on the snapshot they loaded, later lookups see the
//! new table. No lookup can observe a half-built table.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use brrtmatch::hot_reload::{shared, watch_route_table};
//! use brrtmatch::runtime_config::RuntimeConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let runtime = RuntimeConfig::from_env();
//! let router = shared(brrtmatch::config::load_router("routes.yaml", &runtime)?);
//!
//! let _watcher = watch_route_table("routes.yaml", router.clone(), runtime, |r| {
//!     println!("Reloaded {} routes", r.len());
//! })?;
//!
//! // request threads
//! let snapshot = router.load();
//! let _found = snapshot.lookup("GET", None, "/users/1");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! If the new file fails to parse or any route is rejected the error is
//! logged and the previous router stays active.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{error, info, warn};

use crate::config;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;

/// Router handle that can be replaced while readers keep using it
pub type SharedRouter<T> = Arc<ArcSwap<Router<T>>>;

/// Wrap a sealed router for sharing and later replacement
#[must_use]
pub fn shared<T>(router: Router<T>) -> SharedRouter<T> {
    Arc::new(ArcSwap::from_pointee(router))
}

/// Rebuild the router from `table_path` and swap it in
///
/// Returns the number of routes in the new table.
///
/// # Errors
///
/// Returns the load error; `router` is left untouched in that case.
pub fn reload_route_table<P: AsRef<Path>>(
    table_path: P,
    router: &SharedRouter<String>,
    runtime: &RuntimeConfig,
) -> Result<usize> {
    let new_router = config::load_router(table_path, runtime)?;
    let routes_count = new_router.len();
    router.store(Arc::new(new_router));
    Ok(routes_count)
}

/// Watch a route table file and rebuild the shared router when it changes.
///
/// The parent directory is watched so editors that save by renaming a
/// temporary file are picked up. `on_reload` runs after every successful swap
/// with the router that was just installed.
///
/// # Errors
///
/// Returns an error if the watcher cannot be created or registered.
pub fn watch_route_table<P, F>(
    table_path: P,
    router: SharedRouter<String>,
    runtime: RuntimeConfig,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&Router<String>) + Send + 'static,
{
    let path: PathBuf = table_path.as_ref().to_path_buf();
    let watch_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().map(ToOwned::to_owned);
    let table_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                let touches_table = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(ToOwned::to_owned) == file_name);
                if !touches_table {
                    return;
                }
                match reload_route_table(&table_path, &router, &runtime) {
                    Ok(routes_count) => {
                        info!(
                            table = %table_path.display(),
                            routes_count,
                            "hot-reload: route table swapped"
                        );
                        on_reload(&router.load());
                    }
                    Err(err) => {
                        warn!(
                            table = %table_path.display(),
                            error = %format!("{err:#}"),
                            "hot-reload: keeping previous route table"
                        );
                    }
                }
            }
            Err(e) => error!(error = ?e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
    info!(table = %path.display(), "hot-reload: watching route table");
    Ok(watcher)
}
