// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod commands;
mod delivery;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use config::Config;
use delivery::Delivery;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use weather::WeatherClient;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "wxbot", version, about = "METAR and current weather lookups")]
struct Cli {
  /// Path to the TOML configuration file
  #[arg(long, short, default_value = "wxbot.toml")]
  config: PathBuf,

  /// Send the reply to this Telegram chat instead of stdout
  #[arg(long, allow_negative_numbers = true)]
  chat_id: Option<i64>,

  #[command(subcommand)]
  command: Command,
}

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(debug_assertions)]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .init();
}

#[cfg(not(debug_assertions))]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(std::io::stderr)
    .init();
}

#[tokio::main]
async fn main() -> Result<()> {
  #[cfg(debug_assertions)]
  dotenvy::dotenv().ok();
  setup_logging();

  let cli = Cli::parse();
  if run(cli).await? {
    std::process::exit(1);
  }
  Ok(())
}

/// Runs one command and delivers its reply. Returns whether the reply was an error.
#[instrument(skip(cli), fields(config = %cli.config.display()))]
async fn run(cli: Cli) -> Result<bool> {
  let config = Config::load(&cli.config).context("Failed to load configuration")?;
  let client = WeatherClient::from_config(&config).context("Failed to set up weather client")?;
  let delivery = Delivery::from_settings(&config.telegram, cli.chat_id)
    .context("Failed to set up reply delivery")?;

  let reply = commands::execute(&cli.command, &client).await;
  delivery
    .deliver(&reply.text)
    .await
    .context("Failed to deliver reply")?;

  info!(failed = reply.is_error(), "Command finished");
  Ok(reply.is_error())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_metar_command() {
    let cli = Cli::try_parse_from(["wxbot", "metar", "CYOW"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("wxbot.toml"));
    assert_eq!(cli.chat_id, None);
    assert_eq!(
      cli.command,
      Command::Metar {
        station: vec!["CYOW".into()]
      }
    );
  }

  #[test]
  fn parses_free_text_search_and_options() {
    let cli = Cli::try_parse_from([
      "wxbot",
      "--config",
      "/etc/wxbot.toml",
      "--chat-id",
      "-1001234",
      "weather",
      "Rio",
      "de",
      "Janeiro",
    ])
    .unwrap();

    assert_eq!(cli.config, PathBuf::from("/etc/wxbot.toml"));
    assert_eq!(cli.chat_id, Some(-1001234));
    assert_eq!(cli.command.arguments(), "Rio de Janeiro");
  }

  #[test]
  fn empty_arguments_are_accepted_by_the_parser() {
    let cli = Cli::try_parse_from(["wxbot", "metar"]).unwrap();
    assert_eq!(cli.command.arguments(), "");
  }

  #[test]
  fn a_command_is_required() {
    assert!(Cli::try_parse_from(["wxbot"]).is_err());
  }
}
