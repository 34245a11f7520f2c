// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use config::TelegramSettings;
use error::Error;
use std::time::Duration;
use telegram::TelegramClient;
use tracing::{info, instrument};

/// Where a reply ends up.
#[derive(Debug)]
pub enum Delivery {
  Stdout,
  Telegram { client: TelegramClient, chat_id: i64 },
}

impl Delivery {
  /// Telegram when a chat id is known, from `--chat-id` or the configuration;
  /// stdout otherwise.
  pub fn from_settings(settings: &TelegramSettings, chat_id: Option<i64>) -> Result<Self, Error> {
    let Some(chat_id) = chat_id.or(settings.chat_id) else {
      return Ok(Delivery::Stdout);
    };

    let token = settings.bot_token.as_deref().ok_or_else(|| {
      Error::ConfigError(format!(
        "A Telegram chat id was given but {} is not set",
        config::TELEGRAM_TOKEN_VAR
      ))
    })?;

    let mut builder = TelegramClient::builder().token(token);
    if let Some(base_url) = &settings.base_url {
      builder = builder.base_url(base_url.clone());
    }
    if let Some(timeout_ms) = settings.timeout_ms {
      builder = builder.timeout(Duration::from_millis(timeout_ms));
    }

    Ok(Delivery::Telegram {
      client: builder.build()?,
      chat_id,
    })
  }

  #[instrument(skip(self, text))]
  pub async fn deliver(&self, text: &str) -> Result<(), Error> {
    match self {
      Delivery::Stdout => {
        println!("{}", text);
        Ok(())
      }
      Delivery::Telegram { client, chat_id } => {
        client
          .message()
          .chat_id(*chat_id)
          .text(text)
          .disable_preview()
          .send(client)
          .await?;
        info!(chat_id, "Reply delivered to Telegram");
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_chat_id_means_stdout() {
    let delivery = Delivery::from_settings(&TelegramSettings::default(), None).unwrap();
    assert!(matches!(delivery, Delivery::Stdout));
  }

  #[test]
  fn flag_overrides_configured_chat() {
    let settings = TelegramSettings {
      bot_token: Some("1:token".into()),
      chat_id: Some(10),
      ..TelegramSettings::default()
    };
    match Delivery::from_settings(&settings, Some(-100)).unwrap() {
      Delivery::Telegram { chat_id, .. } => assert_eq!(chat_id, -100),
      other => panic!("unexpected delivery: {:?}", other),
    }
  }

  #[test]
  fn chat_without_token_is_a_config_error() {
    let result = Delivery::from_settings(&TelegramSettings::default(), Some(5));
    assert!(matches!(result, Err(Error::ConfigError(_))));
  }
}
