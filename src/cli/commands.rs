use crate::{
    config::load_router,
    hot_reload::{shared, watch_route_table},
    otel::{init_logging_with_config, LogConfig},
    router::Router,
    runtime_config::RuntimeConfig,
};
use anyhow::anyhow;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line interface for brrtmatch
///
/// Loads route table files and exercises the router against them.
#[derive(Parser)]
#[command(name = "brrtmatch")]
#[command(about = "Route table checker and lookup tool", long_about = None)]
pub struct Cli {
    /// Pretty, debug-level logs with source locations instead of `BRRTM_LOG_*`
    #[arg(long, global = true, default_value_t = false)]
    pub dev_logs: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the router from a table and report conflicts or pattern errors
    Check {
        /// Route table file (YAML, JSON or TOML)
        #[arg(short, long)]
        table: PathBuf,
    },
    /// List the routes of a table in registration order
    Routes {
        /// Route table file (YAML, JSON or TOML)
        #[arg(short, long)]
        table: PathBuf,
    },
    /// Resolve a single request against a table
    ///
    /// Exits with an error when no route matches.
    Lookup {
        /// Route table file (YAML, JSON or TOML)
        #[arg(short, long)]
        table: PathBuf,

        /// Request host; omitted means only host-independent routes apply
        #[arg(long)]
        host: Option<String>,

        /// HTTP method, e.g. GET
        method: String,

        /// Request path, e.g. /users/42
        path: String,
    },
    /// Load a table and rebuild the router whenever the file changes
    Watch {
        /// Route table file (YAML, JSON or TOML)
        #[arg(short, long)]
        table: PathBuf,
    },
}

impl Cli {
    /// Logging setup selected by the command line
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        if self.dev_logs {
            LogConfig::default_dev()
        } else {
            LogConfig::from_env()
        }
    }
}

/// Parse the process arguments, set up logging and run the selected command
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = init_logging_with_config(&cli.log_config())?;
    let runtime = RuntimeConfig::from_env();
    let stdout = io::stdout();
    execute(&cli.command, &runtime, &mut stdout.lock())?;
    Ok(())
}

/// Run one command, writing its report to `out`
///
/// `watch` only returns if the watcher cannot be started.
pub fn execute<W: Write>(
    command: &Commands,
    runtime: &RuntimeConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Check { table } => {
            let router = load_router(table, runtime)?;
            writeln!(out, "ok: {} routes in {}", router.len(), table.display())?;
            Ok(())
        }
        Commands::Routes { table } => {
            let router = load_router(table, runtime)?;
            for route in router.routes() {
                writeln!(
                    out,
                    "{:<7} {:<24} {:<40} {}",
                    route.method(),
                    route.host().unwrap_or("*"),
                    route.pattern(),
                    route.route_id()
                )?;
            }
            Ok(())
        }
        Commands::Lookup {
            table,
            host,
            method,
            path,
        } => {
            let router = load_router(table, runtime)?;
            let found = router
                .lookup(method, host.as_deref(), path)
                .into_match()
                .ok_or_else(|| anyhow!("no route matches {method} {path}"))?;
            writeln!(out, "route: {}", found.route_id())?;
            writeln!(out, "pattern: {}", found.route.pattern())?;
            for (name, value) in &found.params {
                writeln!(out, "  {name} = {value}")?;
            }
            Ok(())
        }
        Commands::Watch { table } => {
            let router = shared(load_router(table, runtime)?);
            writeln!(out, "watching {} ({} routes)", table.display(), router.load().len())?;
            out.flush()?;
            let _watcher = watch_route_table(table, router, *runtime, report_reload)?;
            loop {
                std::thread::park();
            }
        }
    }
}

fn report_reload(router: &Router<String>) {
    println!("reloaded: {} routes", router.len());
}
