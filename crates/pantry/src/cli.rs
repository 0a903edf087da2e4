//! Clap derive structures for the `pantry` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pantry_core::ResolveStrategy;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pantry -- pantry inventory sensors from the Bogyi Konyha add-on
#[derive(Debug, Parser)]
#[command(
    name = "pantry",
    version,
    about = "Expose pantry add-on inventory as sensors",
    long_about = "Polls the pantry add-on's HTTP API and exposes every inventory\n\
        item as a sensor with its quantity, unit and expiry date.\n\n\
        Run `pantry setup` once to locate the add-on, then `pantry items`\n\
        or `pantry watch`.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PANTRY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (falls back to `[defaults] output`, then table)
    #[arg(long, short = 'o', env = "PANTRY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output (falls back to `[defaults] color`, then auto)
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "PANTRY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
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
    /// Plain text, one value per line (scripting)
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Locate the pantry add-on and create the config entry
    Setup(SetupArgs),

    /// Manage stored config entries
    #[command(alias = "e")]
    Entries(EntriesArgs),

    /// Fetch the inventory once and show the resulting sensors
    #[command(alias = "ls")]
    Items(ItemsArgs),

    /// Keep polling and print the sensors after every update
    Watch(WatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Setup ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// How to determine the add-on's address
    #[arg(long, short = 's', default_value = "discover")]
    pub strategy: StrategyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Ask the supervisor for the add-on's IP address
    Discover,
    /// Use the add-on's fixed internal hostname
    InternalHostname,
    /// Poll through the supervisor's add-on proxy
    SupervisorProxy,
}

impl From<StrategyArg> for ResolveStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Discover => Self::Discover,
            StrategyArg::InternalHostname => Self::InternalHostname,
            StrategyArg::SupervisorProxy => Self::SupervisorProxy,
        }
    }
}

// ── Entries ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EntriesArgs {
    #[command(subcommand)]
    pub command: EntriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EntriesCommand {
    /// List stored entries
    #[command(alias = "ls")]
    List,

    /// Remove a stored entry
    #[command(alias = "rm")]
    Remove {
        /// Entry ID (or unambiguous prefix)
        id: String,
    },
}

// ── Items / Watch ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ItemsArgs {
    /// Entry ID (or prefix); required when several entries exist
    #[arg(long, short = 'e')]
    pub entry: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Entry ID (or prefix); required when several entries exist
    #[arg(long, short = 'e')]
    pub entry: Option<String>,

    /// Poll interval in seconds (overrides the config file)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
