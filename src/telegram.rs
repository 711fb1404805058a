//! Bot API access through `teloxide`.

use std::path::Path;

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatId, ChatMember, FileId, UserId};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::{CommandSpec, Config};
use crate::download::FileFetcher;
use crate::error::BotlogError;

/// Environment variable holding the bot token; wins over the token file.
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Resolve the bot token from the environment value or the token file.
pub fn resolve_token(env_value: Option<String>, token_file: &Path) -> Result<String, BotlogError> {
    if let Some(token) = env_value.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        return Ok(token);
    }

    let content = std::fs::read_to_string(token_file).map_err(|e| {
        BotlogError::Config(format!(
            "{TOKEN_ENV} is not set and token file {} is unreadable: {e}",
            token_file.display()
        ))
    })?;
    let token = content.trim();
    if token.is_empty() {
        return Err(BotlogError::Config(format!(
            "token file {} is empty",
            token_file.display()
        )));
    }
    Ok(token.to_string())
}

/// Build a bot client from the configured credentials.
pub fn build_bot(config: &Config) -> Result<Bot, BotlogError> {
    let token = resolve_token(std::env::var(TOKEN_ENV).ok(), &config.token_file)?;
    Ok(Bot::new(token))
}

/// [`FileFetcher`] backed by the Bot API `getFile` endpoint.
#[derive(Clone)]
pub struct TelegramFetcher {
    bot: Bot,
}

impl TelegramFetcher {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl FileFetcher for TelegramFetcher {
    async fn fetch(&self, file_id: &str, dest: &Path) -> Result<(), BotlogError> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        debug!(file_id, remote = %file.path, "resolved file path");

        let mut dst = tokio::fs::File::create(dest).await?;
        self.bot.download_file(&file.path, &mut dst).await?;
        dst.flush().await?;
        Ok(())
    }
}

/// Register `commands` as the bot's slash-commands and read them back.
pub async fn register_commands(
    bot: &Bot,
    commands: &[CommandSpec],
) -> Result<Vec<BotCommand>, BotlogError> {
    let commands: Vec<BotCommand> = commands
        .iter()
        .map(|c| BotCommand::new(c.command.clone(), c.description.clone()))
        .collect();

    info!(count = commands.len(), "setting bot commands");
    bot.set_my_commands(commands).await?;
    Ok(bot.get_my_commands().await?)
}

/// Look up `user`'s membership in `chat`.
pub async fn inspect_member(bot: &Bot, chat: i64, user: u64) -> Result<ChatMember, BotlogError> {
    debug!(chat, user, "getChatMember");
    Ok(bot.get_chat_member(ChatId(chat), UserId(user)).await?)
}
