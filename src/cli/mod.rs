use anyhow::{Result, bail};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::config::AppConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::lifecycle::LifecycleManager;
use crate::core::terminal::{self, print_info, print_status};
use crate::interfaces::telegram::TelegramInterface;
use crate::logging;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run,
    Status,
    Ask(String),
    Chat(String),
    Help,
    Unknown(String),
}

fn print_help() {
    println!(
        "\n {} {}\n",
        style("pcmanager").green().bold(),
        style("- điều khiển máy tính qua Telegram").dim()
    );
    terminal::print_command("run", "Start the Telegram bot (default)");
    terminal::print_command("status", "Query the PC status once");
    terminal::print_command("ask", "Run one message through the bot pipeline (-p <text>)");
    terminal::print_command("chat", "Small talk with the assistant (-p <text>)");
    terminal::print_command("help", "Show this message");
    println!(
        "\n {} {} <command> [--prompt <text>]\n",
        style("Usage:").bold(),
        style("pcmanager").green()
    );
}

pub fn parse_prompt_flag(args: &[String], start: usize) -> String {
    let mut prompt = String::new();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--prompt" | "-p" => {
                if i + 1 < args.len() {
                    prompt = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    prompt
}

pub fn parse_command(args: &[String]) -> CliCommand {
    match args.get(1).map(String::as_str) {
        None | Some("run") => CliCommand::Run,
        Some("status") => CliCommand::Status,
        Some("ask") => CliCommand::Ask(parse_prompt_flag(args, 2)),
        Some("chat") => CliCommand::Chat(parse_prompt_flag(args, 2)),
        Some("help") | Some("--help") | Some("-h") => CliCommand::Help,
        Some(other) => CliCommand::Unknown(other.to_string()),
    }
}

/// A missing `.env` is normal; anything else (bad syntax, unreadable file) is
/// worth a warning.
fn dotenv_problem(result: &dotenvy::Result<PathBuf>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(e.to_string()),
        _ => None,
    }
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = parse_command(&args);

    match &command {
        CliCommand::Help => {
            print_help();
            return Ok(());
        }
        CliCommand::Unknown(cmd) => {
            print_help();
            bail!("Unknown command '{}'", cmd);
        }
        CliCommand::Ask(p) | CliCommand::Chat(p) if p.trim().is_empty() => {
            print_help();
            bail!("--prompt is required for this command");
        }
        _ => {}
    }

    // Loaded before logging so LOG_LEVEL may come from the file.
    let dotenv_result = dotenvy::dotenv();
    logging::init(logging::level_from_env());
    if let Some(problem) = dotenv_problem(&dotenv_result) {
        warn!("Ignoring .env file: {}", problem);
    }

    let config = AppConfig::from_env()?;
    let dispatcher = Arc::new(Dispatcher::from_config(&config)?);

    match command {
        CliCommand::Run => run_bot(&config, dispatcher).await,
        CliCommand::Status => {
            print_status("PC API", &config.pc_api_base_url);
            terminal::print_reply(&dispatcher.status().await);
            Ok(())
        }
        CliCommand::Ask(prompt) => {
            terminal::print_reply(&dispatcher.handle_text(&prompt).await);
            Ok(())
        }
        CliCommand::Chat(prompt) => {
            terminal::print_reply(&dispatcher.converse(&prompt).await);
            Ok(())
        }
        CliCommand::Help | CliCommand::Unknown(_) => Ok(()),
    }
}

async fn run_bot(config: &AppConfig, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let telegram = TelegramInterface::from_config(config, dispatcher);

    let mut lifecycle = LifecycleManager::new();
    lifecycle.attach(Arc::new(Mutex::new(telegram)));
    lifecycle.start().await?;

    print_info("Bot is running. Press Ctrl-C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received, stopping");

    lifecycle.shutdown().await?;
    terminal::print_goodbye();
    Ok(())
}
