//! Clap derive structures for the `ctewatch` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ctewatch -- read Chaos Traffic Engine telemetry from the command line
#[derive(Debug, Parser)]
#[command(
    name = "ctewatch",
    version,
    about = "Read Chaos Traffic Engine telemetry from the command line",
    long_about = "Fetches stats, chaos metrics and DNS cache counters from a running\n\
        Chaos Traffic Engine proxy and prints them as tables, JSON or YAML.\n\n\
        For the live dashboard, run ctewatch-tui.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Proxy base URL (overrides the config file)
    #[arg(long, short = 'u', env = "CTEWATCH_URL", global = true)]
    pub url: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, short = 'c', env = "CTEWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CTEWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, short = 't', global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain `label<TAB>value` lines (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one poll cycle and print every readout
    #[command(alias = "snap", alias = "s")]
    Snapshot(SnapshotArgs),

    /// Poll continuously and print one summary line per cycle
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Probe the proxy's health endpoint
    Health,

    /// Inspect or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Print the raw telemetry values instead of dashboard readouts
    /// (table/plain only; JSON and YAML are always raw)
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in milliseconds (overrides the config file)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Stop after this many cycles
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the resolved configuration (defaults, file, environment)
    Show,

    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ctewatch", "snapshot", "-o", "json", "--url", "http://h:1", "-t", "3",
        ])
        .map_err(|e| e.to_string());
        let cli = match cli {
            Ok(cli) => cli,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(cli.global.output, OutputFormat::Json);
        assert_eq!(cli.global.url.as_deref(), Some("http://h:1"));
        assert_eq!(cli.global.timeout, Some(3));
        assert!(matches!(cli.command, Command::Snapshot(SnapshotArgs { raw: false })));
    }
}
