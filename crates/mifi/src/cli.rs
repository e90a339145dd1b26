//! Clap derive structures for the `mifi` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mifi -- control a MiFi LTE/WiFi router from the command line
#[derive(Debug, Parser)]
#[command(
    name = "mifi",
    version,
    about = "Control MiFi LTE/WiFi routers from the command line",
    long_about = "Talks to the router's goform web API: live status, WiFi settings,\n\
        attached clients, SMS, mobile data, and power control.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "MIFI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device address, host or URL (overrides profile)
    #[arg(long, short = 'H', env = "MIFI_HOST", global = true)]
    pub host: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "MIFI_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MIFI_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MIFI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// Show live router status
    #[command(alias = "st")]
    Status,

    /// Show or change WiFi access point settings
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// List clients attached to the WiFi
    #[command(alias = "clients")]
    Devices,

    /// Read, send, and delete SMS messages
    Sms(SmsArgs),

    /// Bring the mobile data session up or down
    #[command(alias = "net")]
    Network(NetworkArgs),

    /// Reachability, reboot, and shutdown
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Poll the router and stream status and new-message events
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── WiFi ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: WifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// Show the current access point settings
    Show {
        /// Include the WiFi password in the output
        #[arg(long)]
        reveal: bool,
    },

    /// Change access point settings; unset flags keep their current value
    Set {
        #[arg(long)]
        ssid: Option<String>,

        /// New passphrase (prompted for when --prompt-password is given)
        #[arg(long, conflicts_with = "prompt_password")]
        password: Option<String>,

        /// Read the new passphrase from the terminal
        #[arg(long)]
        prompt_password: bool,

        /// Security mode as the device spells it (OPEN, WPA2PSK, WPA2/WPA3PSK, ...)
        #[arg(long)]
        security: Option<String>,

        /// Hide or broadcast the SSID
        #[arg(long)]
        hidden: Option<bool>,

        /// Radio channel (0 = auto)
        #[arg(long)]
        channel: Option<i32>,

        /// Maximum number of WiFi clients
        #[arg(long)]
        max_clients: Option<i32>,
    },
}

// ── SMS ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SmsArgs {
    #[command(subcommand)]
    pub command: SmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SmsCommand {
    /// List stored messages, newest first
    #[command(alias = "ls")]
    List {
        /// Zero-based page
        #[arg(long, default_value = "0")]
        page: u32,

        /// Messages per page
        #[arg(long, default_value = "20")]
        per_page: u32,

        /// Only show unread inbox messages
        #[arg(long)]
        unread: bool,
    },

    /// Show the number of stored messages
    Count,

    /// Send a message
    Send {
        /// Recipient phone number
        number: String,

        /// Message text
        text: String,
    },

    /// Delete messages by id
    #[command(alias = "rm")]
    Delete {
        /// Message ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

// ── Network ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NetworkArgs {
    #[command(subcommand)]
    pub command: NetworkCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    /// Bring the mobile data session up
    Connect,
    /// Take the mobile data session down
    Disconnect,
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Check that the device answers, without logging in
    Ping,
    /// Reboot the router
    Reboot,
    /// Power the router off
    Shutdown,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Only print new-message events
    #[arg(long)]
    pub sms_only: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Display the resolved configuration (passwords redacted)
    Show,

    /// Print the config file location
    Path,

    /// Set a profile value
    Set {
        /// Config key (host, username, password_env, insecure, timeout, poll_interval, auto_reconnect)
        key: String,
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the device password in the system keyring
    SetPassword {
        /// Profile to store the password for
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
