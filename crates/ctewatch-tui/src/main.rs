//! `ctewatch-tui` — live terminal dashboard for a Chaos Traffic Engine proxy.
//!
//! Polls `/api/stats`, `/api/chaos` and `/api/dns` on a fixed cadence and
//! renders gauges, rings, donuts and a traffic sparkline with ratatui.
//!
//! Logs go to a file (default `/tmp/ctewatch-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod view;
mod widgets;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ctewatch_config::Config;

use crate::app::App;

/// Live terminal dashboard for Chaos Traffic Engine telemetry.
#[derive(Parser, Debug)]
#[command(name = "ctewatch-tui", version, about)]
struct Cli {
    /// Proxy base URL (e.g., http://127.0.0.1:8080)
    #[arg(short = 'u', long, env = "CTEWATCH_URL")]
    url: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(short = 'c', long, env = "CTEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// Log file path (defaults to /tmp/ctewatch-tui.log)
    #[arg(long, default_value = "/tmp/ctewatch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The returned guard flushes the writer on drop and
/// must live as long as the app.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ctewatch_tui={log_level},ctewatch_core={log_level},ctewatch_api={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("ctewatch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file (explicit path or the default location), then flag overrides.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => ctewatch_config::load_config_from(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => ctewatch_config::load_config_or_default(),
    };

    if let Some(url) = &cli.url {
        cfg.source.url.clone_from(url);
    }
    if let Some(ms) = cli.interval {
        cfg.poll.interval_ms = ms;
    }

    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);

    tui::install_hooks()?;

    let config = resolve_config(&cli)?;
    info!(url = %config.source.url, interval_ms = config.poll.interval_ms, "starting ctewatch-tui");

    let mut app = App::new(&config)?;
    app.run().await
}
