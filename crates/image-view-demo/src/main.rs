mod app;
mod cli;
mod config;
mod gallery;
mod loader;
mod theme;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Notify;

use crate::cli::Cli;
use crate::config::Config;
use crate::gallery::Gallery;
use crate::loader::SyntheticLoader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("imgview.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; --debug raises the default level.
    let default_filter = if cli.debug { "debug" } else { "info" };
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("imgview log: {}", log_path.display());

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {}", e);
        Config::default()
    });
    cli.apply(&mut config);
    tracing::info!("imgview starting with {:?}", config);

    // ── Loader + gallery ─────────────────────────────────────────────────────
    let loader = Arc::new(SyntheticLoader::new(config.loader.clone()));
    let stats = loader.stats();
    let waker = Arc::new(Notify::new());
    let gallery = Gallery::new(&config.gallery, config.view.clone(), loader, Arc::clone(&waker));

    // ── Run TUI ──────────────────────────────────────────────────────────────
    app::App::new(gallery, stats, waker).run().await
}
