// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fileset;
pub mod graph;
pub mod logging;
pub mod pipelines;
pub mod reload;
pub mod task;
pub mod watch;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::graph::{execute, RunContext};
use crate::pipelines::Registry;
use crate::reload::ReloadChannel;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the compiled-in pipeline registry
/// - the graph runner
/// - (watch mode only) reload channel, dev server and file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;
    let registry = pipelines::build(&cfg)?;

    if args.dry_run {
        print_dry_run(&registry, &args.pipeline);
        return Ok(());
    }

    let root = std::env::current_dir().context("resolving current directory")?;
    let ctx = RunContext::new(root.clone());

    let node = pipelines::select(&registry, &args.pipeline)?;
    let watch_mode = registry.is_watch_pipeline(&args.pipeline) && !args.once;

    if !watch_mode {
        // One-shot: any unrecovered task/graph error is fatal and maps to
        // a non-zero exit in main.
        execute(node, &ctx)
            .await
            .with_context(|| format!("pipeline '{}' failed", args.pipeline))?;
        info!(pipeline = %args.pipeline, "pipeline finished");
        return Ok(());
    }

    // Watch mode: reload channel + dev server + watcher, then park until
    // Ctrl-C. The initial build is reported but never fatal; the dev loop
    // stays up.
    let (reload_channel, reload_port) = ReloadChannel::start(cfg.paths.reload_port)?;
    let _server = reload::server::start(root.join(&cfg.paths.pages_dir), cfg.paths.http_port);
    info!(reload_port, "live reload ready");

    if let Err(err) = execute(node, &ctx).await {
        warn!(error = %err, "initial build had failures; watching anyway");
    }

    let bindings = registry.bindings;
    let _watcher = watch::spawn_watcher(root, bindings, ctx, reload_channel)?;

    tokio::signal::ctrl_c()
        .await
        .context("listening for Ctrl+C")?;
    info!("shutdown requested, stopping");

    Ok(())
}

/// Simple dry-run output: print known pipelines and the selected tree.
fn print_dry_run(registry: &Registry, selected: &str) {
    println!("assetpipe dry-run");
    println!();

    println!("pipelines:");
    for name in registry.names() {
        println!("  - {name}");
    }
    println!();

    match registry.node(selected) {
        Some(node) => {
            println!("selected '{selected}':");
            print!("{}", node.render(1));
        }
        None => println!("selected '{selected}' is not a known pipeline"),
    }
}
