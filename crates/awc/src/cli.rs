//! Clap derive structures for the `awc` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// awc -- AWC-Connect church portal from the command line
#[derive(Debug, Parser)]
#[command(
    name = "awc",
    version,
    about = "AWC-Connect church portal from the command line",
    long_about = "Query the AWC-Connect portal: notifications, staff chat, role-based\n\
        access rules, the church video channel, and the church assistant.",
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
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "AWC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Portal URL (overrides config)
    #[arg(long, env = "AWC_PORTAL", global = true)]
    pub portal: Option<String>,

    /// Session bearer token (overrides keyring and config)
    #[arg(long, env = "AWC_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Act as this role (overrides the configured session role)
    #[arg(long, short = 'r', env = "AWC_ROLE", global = true)]
    pub role: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AWC_OUTPUT",
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
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Inspect role permissions, field visibility, and navigation
    #[command(alias = "acl")]
    Access(AccessArgs),

    /// Read and acknowledge notifications
    #[command(alias = "notif", alias = "n")]
    Notifications(NotificationsArgs),

    /// Staff chat unread counters
    Chat(ChatArgs),

    /// Church video channel
    #[command(alias = "v")]
    Videos(VideosArgs),

    /// Ask the church assistant a question
    Ask(AskArgs),

    /// Manage CLI configuration and credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Access ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccessArgs {
    #[command(subcommand)]
    pub command: AccessCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// Does ROLE hold PERMISSION? (e.g. `finance finance:read`)
    Can { role: String, permission: String },

    /// May ROLE open a staff portal PATH?
    Path { role: String, path: String },

    /// Member fields visible to ROLE
    Fields { role: String },

    /// Permissions granted to ROLE
    Permissions { role: String },

    /// Staff navigation as ROLE sees it
    Nav {
        role: String,

        /// Ministry scope (repeatable; ministry leaders only)
        #[arg(long = "scope", short = 's')]
        scopes: Vec<String>,
    },

    /// Route guard decision for the current session
    Check {
        path: String,

        /// Redirect here instead of rendering a fallback when denied
        #[arg(long)]
        fallback: Option<String>,
    },
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications
    #[command(alias = "ls")]
    List {
        /// Only unread notifications
        #[arg(long, short = 'u')]
        unread: bool,
    },

    /// Poll and print unread count changes until interrupted
    Watch,

    /// Mark notifications read
    Read {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Mark every notification read
    ReadAll,
}

// ── Chat ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ChatArgs {
    #[command(subcommand)]
    pub command: ChatCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    /// List chat threads with unread counts
    #[command(alias = "ls")]
    Threads,

    /// Poll and print unread totals until interrupted
    Watch,

    /// Mark a channel read
    Read { channel: String },
}

// ── Videos ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VideosArgs {
    #[command(subcommand)]
    pub command: VideosCommand,
}

#[derive(Debug, Subcommand)]
pub enum VideosCommand {
    /// Is the channel live right now?
    Live,

    /// Most recent uploads
    Recent {
        #[arg(long, short = 'l', default_value = "6")]
        limit: u32,
    },

    /// Scheduled broadcasts
    Upcoming,
}

// ── Assistant ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the session token in the system keyring
    SetToken {
        /// Token value (prompted when omitted)
        #[arg(long)]
        value: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
