//! Command-line argument definitions for `botlog`.
//!
//! Uses [`clap`] derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Rebuild Telegram bot update logs and extract chat media from them.
#[derive(Debug, Parser)]
#[command(name = "botlog", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub action: Action,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log dropped records and other diagnostics to stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Convert a raw bot log into a JSON object of update responses.
    Parse(ParseArgs),
    /// Write a chat's transcript and download its attachments.
    Extract(ExtractArgs),
    /// Print a chat's transcript to stdout.
    Messages(MessagesArgs),
    /// Register the configured slash-commands with the bot.
    Commands,
    /// Show a user's membership record in a chat.
    Member(MemberArgs),
    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Raw log file written by the bot.
    pub log: PathBuf,

    /// Output file. Defaults to `<LOG>.json`.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Text that follows the timestamp on response dump lines.
    #[arg(short = 'm', long, value_parser = parse_marker_arg)]
    pub marker: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// JSON file produced by `botlog parse`.
    pub parsed: PathBuf,

    /// Title of the chat to extract.
    #[arg(long)]
    pub chat: Option<String>,

    /// Root directory for per-chat output.
    #[arg(short = 'd', long)]
    pub out_dir: Option<PathBuf>,

    /// Only write the transcript; do not contact Telegram.
    #[arg(long)]
    pub no_download: bool,
}

#[derive(Debug, Args)]
pub struct MessagesArgs {
    /// JSON file produced by `botlog parse`.
    pub parsed: PathBuf,

    /// Title of the chat to print.
    #[arg(long)]
    pub chat: Option<String>,

    /// Control color output.
    ///
    /// `auto` enables colors only when stdout is a TTY and `NO_COLOR` is unset.
    #[arg(short = 'c', long, value_enum)]
    pub color: Option<ColorMode>,
}

#[derive(Debug, Args)]
pub struct MemberArgs {
    /// Chat id or an alias from the `[chats]` config table.
    pub chat: String,

    /// User id or an alias from the `[users]` config table.
    pub user: String,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Enable colors only when stdout is a TTY.
    Auto,
    /// Always enable colors.
    Always,
    /// Never enable colors.
    Never,
}

/// Reject blank markers; they would turn every timestamped line into a record.
fn parse_marker_arg(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("marker cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}
