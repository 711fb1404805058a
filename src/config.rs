//! Configuration management with TOML file support.
//!
//! Merges settings from three sources (highest precedence first):
//! 1. CLI flags
//! 2. Config file (`~/.config/botlog/config.toml` or `$XDG_CONFIG_HOME/botlog/config.toml`)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::{Action, Cli, ColorMode};
use crate::error::BotlogError;
use crate::parser::DEFAULT_MARKER;

/// A slash-command advertised by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    pub description: String,
}

impl CommandSpec {
    fn new(command: &str, description: &str) -> Self {
        Self {
            command: command.to_string(),
            description: description.to_string(),
        }
    }
}

/// Runtime configuration merged from defaults, config file, and CLI arguments.
///
/// Use [`Config::from_cli`] to build from parsed CLI arguments, or
/// [`Config::default`] for built-in defaults (useful in tests and benchmarks).
#[derive(Debug, Clone)]
pub struct Config {
    /// Color output mode (auto/always/never).
    pub color_mode: ColorMode,
    /// Title of the chat whose messages and media are extracted.
    pub chat_title: String,
    /// Text following the timestamp on response dump lines.
    pub marker: String,
    /// Root directory for per-chat output.
    pub out_dir: PathBuf,
    /// File holding the bot token when `TELEGRAM_BOT_TOKEN` is unset.
    pub token_file: PathBuf,
    /// strftime-compatible format for transcript dates; raw keys when unset.
    pub timestamp_format: Option<String>,
    /// Chat aliases → chat ids.
    pub chats: BTreeMap<String, i64>,
    /// User aliases → user ids.
    pub users: BTreeMap<String, u64>,
    /// Slash-commands registered by `botlog commands`.
    pub commands: Vec<CommandSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Auto,
            chat_title: "Common Lisp Brasil".to_string(),
            marker: DEFAULT_MARKER.to_string(),
            out_dir: PathBuf::from("docs"),
            token_file: PathBuf::from("token.txt"),
            timestamp_format: None,
            chats: BTreeMap::new(),
            users: BTreeMap::new(),
            commands: vec![
                CommandSpec::new("kills", "Retorna a quantidade de trolls decapitados."),
                CommandSpec::new(
                    "ping",
                    "Verifica se estou vivo. Se eu não responder já sabe.",
                ),
                CommandSpec::new(
                    "pass",
                    "Commando de passe /pass <@username>. Exclusivo para admins do @commonlispbr.",
                ),
            ],
        }
    }
}

impl Config {
    /// Build a [`Config`] from CLI arguments, loading the config file if present.
    ///
    /// Merge precedence: CLI flags > config file > defaults. An explicit
    /// `--config` path must exist.
    pub fn from_cli(cli: &Cli) -> Result<Self, BotlogError> {
        let mut config = Self::default();

        let config_path = match &cli.config {
            Some(path) if !path.exists() => {
                return Err(BotlogError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => path.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let file_config = FileConfig::load(&config_path)?;
            config.apply_file_config(file_config)?;
        }

        match &cli.action {
            Action::Parse(args) => {
                if let Some(marker) = &args.marker {
                    config.marker.clone_from(marker);
                }
            }
            Action::Extract(args) => {
                if let Some(chat) = &args.chat {
                    config.chat_title.clone_from(chat);
                }
                if let Some(dir) = &args.out_dir {
                    config.out_dir.clone_from(dir);
                }
            }
            Action::Messages(args) => {
                if let Some(chat) = &args.chat {
                    config.chat_title.clone_from(chat);
                }
                if let Some(color) = args.color {
                    config.color_mode = color;
                }
            }
            Action::Commands | Action::Member(_) | Action::Completions { .. } => {}
        }

        Ok(config)
    }

    /// Default config file path: `$XDG_CONFIG_HOME/botlog/config.toml` or `~/.config/botlog/config.toml`.
    fn default_config_path() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("botlog").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("botlog")
                .join("config.toml")
        } else {
            PathBuf::from(".config/botlog/config.toml")
        }
    }

    /// Apply settings from a parsed config file.
    fn apply_file_config(&mut self, file: FileConfig) -> Result<(), BotlogError> {
        if let Some(color) = file.color {
            self.color_mode = match color.as_str() {
                "always" => ColorMode::Always,
                "never" => ColorMode::Never,
                "auto" => ColorMode::Auto,
                other => {
                    return Err(BotlogError::Config(format!(
                        "invalid color '{other}': expected one of auto, always, never"
                    )));
                }
            };
        }

        if let Some(title) = file.chat_title {
            self.chat_title = title;
        }

        if let Some(marker) = file.marker {
            if marker.trim().is_empty() {
                return Err(BotlogError::Config("marker cannot be empty".into()));
            }
            self.marker = marker.trim().to_string();
        }

        if let Some(dir) = file.out_dir {
            self.out_dir = dir;
        }

        if let Some(token_file) = file.token_file {
            self.token_file = token_file;
        }

        if let Some(format) = file.timestamp_format {
            self.timestamp_format = Some(format);
        }

        if let Some(chats) = file.chats {
            self.chats.extend(chats);
        }

        if let Some(users) = file.users {
            self.users.extend(users);
        }

        if let Some(commands) = file.commands {
            self.commands = commands;
        }

        Ok(())
    }

    /// Resolve a chat given as a numeric id or a `[chats]` alias.
    pub fn resolve_chat(&self, chat: &str) -> Result<i64, BotlogError> {
        if let Ok(id) = chat.parse() {
            return Ok(id);
        }
        let alias = chat.trim_start_matches('@');
        self.chats
            .get(alias)
            .copied()
            .ok_or_else(|| BotlogError::Config(format!("unknown chat '{chat}'")))
    }

    /// Resolve a user given as a numeric id or a `[users]` alias.
    pub fn resolve_user(&self, user: &str) -> Result<u64, BotlogError> {
        if let Ok(id) = user.parse() {
            return Ok(id);
        }
        let alias = user.trim_start_matches('@');
        self.users
            .get(alias)
            .copied()
            .ok_or_else(|| BotlogError::Config(format!("unknown user '{user}'")))
    }
}

/// Config file structure (TOML deserialization).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    color: Option<String>,
    chat_title: Option<String>,
    marker: Option<String>,
    out_dir: Option<PathBuf>,
    token_file: Option<PathBuf>,
    timestamp_format: Option<String>,
    chats: Option<BTreeMap<String, i64>>,
    users: Option<BTreeMap<String, u64>>,
    commands: Option<Vec<CommandSpec>>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, BotlogError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BotlogError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
