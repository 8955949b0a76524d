use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::payloads::SendMessageSetters;
use teloxide::types::{BotCommand, ChatAction, ParseMode};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::core::config::{AppConfig, ProxyConfig};
use crate::core::dispatcher::Dispatcher;
use crate::core::lifecycle::LifecycleComponent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Status,
}

pub enum Inbound<'a> {
    Command(Command),
    /// Slash command the bot does not register; ignored.
    UnknownCommand(&'a str),
    Text(&'a str),
}

/// Routes by slash prefix. Accepts the `/cmd@BotName` form used in groups.
pub fn route(text: &str) -> Inbound<'_> {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Inbound::Text(trimmed);
    };
    let word = rest.split_whitespace().next().unwrap_or("");
    let name = word.split('@').next().unwrap_or("");
    match name {
        "start" => Inbound::Command(Command::Start),
        "help" => Inbound::Command(Command::Help),
        "status" => Inbound::Command(Command::Status),
        _ => Inbound::UnknownCommand(trimmed),
    }
}

pub struct TelegramInterface {
    token: String,
    proxy: Option<ProxyConfig>,
    dispatcher: Arc<Dispatcher>,
    handle: Option<JoinHandle<()>>,
}

impl TelegramInterface {
    pub fn new(token: String, proxy: Option<ProxyConfig>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            token,
            proxy,
            dispatcher,
            handle: None,
        }
    }

    pub fn from_config(config: &AppConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self::new(config.telegram_token.clone(), config.proxy.clone(), dispatcher)
    }

    fn build_bot(&self) -> Result<Bot> {
        match &self.proxy {
            Some(proxy) => {
                let client = teloxide::net::default_reqwest_settings()
                    .proxy(reqwest::Proxy::all(proxy.url())?)
                    .timeout(Duration::from_secs(30))
                    .build()?;
                Ok(Bot::with_client(&self.token, client))
            }
            None => Ok(Bot::new(&self.token)),
        }
    }

    async fn start_bot(&mut self) -> Result<()> {
        let bot_client = self.build_bot()?;

        let commands = vec![
            BotCommand::new("start", "Bắt đầu sử dụng bot"),
            BotCommand::new("help", "Hiển thị hướng dẫn"),
            BotCommand::new("status", "Kiểm tra trạng thái máy tính"),
        ];
        if let Err(e) = bot_client.set_my_commands(commands).await {
            error!("Failed to set telegram bot commands: {}", e);
        }

        let dispatcher = self.dispatcher.clone();

        self.handle = Some(tokio::spawn(async move {
            teloxide::repl(bot_client, move |bot: Bot, msg: Message| {
                let dispatcher = dispatcher.clone();
                async move {
                    let Some(text) = msg.text() else {
                        return Ok(());
                    };
                    let (first_name, user_id) = msg
                        .from
                        .as_ref()
                        .map(|u| (u.first_name.clone(), u.id.0))
                        .unwrap_or_else(|| ("bạn".to_string(), 0));

                    // Only the fixed welcome/help texts carry markup.
                    let (reply, parse_mode) = match route(text) {
                        Inbound::Command(Command::Start) => {
                            (dispatcher.welcome(&first_name), Some(ParseMode::Html))
                        }
                        Inbound::Command(Command::Help) => {
                            (dispatcher.help().to_string(), Some(ParseMode::Html))
                        }
                        Inbound::Command(Command::Status) => (
                            with_typing(&bot, msg.chat.id, dispatcher.status()).await,
                            None,
                        ),
                        Inbound::UnknownCommand(cmd) => {
                            debug!("Ignoring unregistered command: {}", cmd);
                            return Ok(());
                        }
                        Inbound::Text(text) => {
                            info!(
                                "Received message from {} ({}): {}",
                                first_name, user_id, text
                            );
                            (
                                with_typing(&bot, msg.chat.id, dispatcher.handle_text(text))
                                    .await,
                                None,
                            )
                        }
                    };

                    let mut request = bot.send_message(msg.chat.id, reply);
                    if let Some(mode) = parse_mode {
                        request = request.parse_mode(mode);
                    }
                    if let Err(e) = request.await {
                        error!("Failed to send reply to chat {}: {}", msg.chat.id.0, e);
                    }
                    Ok(())
                }
            })
            .await;
        }));
        Ok(())
    }
}

// Keeps the "typing…" indicator alive while a slow remote call runs.
async fn with_typing<F>(bot: &Bot, chat: ChatId, work: F) -> String
where
    F: std::future::Future<Output = String>,
{
    let typing_bot = bot.clone();
    let (typing_stop_tx, mut typing_stop_rx) = tokio::sync::oneshot::channel::<()>();
    let typing_task = tokio::spawn(async move {
        loop {
            let _ = typing_bot.send_chat_action(chat, ChatAction::Typing).await;

            tokio::select! {
                _ = &mut typing_stop_rx => break,
                _ = tokio::time::sleep(Duration::from_secs(4)) => {}
            }
        }
    });

    let reply = work.await;

    let _ = typing_stop_tx.send(());
    let _ = typing_task.await;
    reply
}

#[async_trait]
impl LifecycleComponent for TelegramInterface {
    async fn on_init(&mut self) -> Result<()> {
        info!("Telegram Interface initializing...");
        Ok(())
    }

    async fn on_start(&mut self) -> Result<()> {
        info!("Telegram Interface starting...");
        if let Err(e) = self.start_bot().await {
            error!("Telegram Bot crashed: {}", e);
            return Err(e);
        }
        info!("PC Manager Telegram Bot started successfully");
        Ok(())
    }

    async fn on_shutdown(&mut self) -> Result<()> {
        info!("Telegram Interface shutting down...");
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        Ok(())
    }
}
