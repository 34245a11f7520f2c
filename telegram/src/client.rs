// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  builders::{MessageBuilder, TelegramClientBuilder},
  config::TelegramConfig,
  types::{Message, TelegramResponse},
};
use error::Error;
use reqwest::Client;
use tracing::{debug, instrument, warn};

#[derive(Clone, Debug)]
pub struct TelegramClient {
  pub(crate) config: TelegramConfig,
  pub(crate) client: Client,
}

impl TelegramClient {
  pub fn builder() -> TelegramClientBuilder {
    TelegramClientBuilder::default()
  }

  pub fn message<'a>(&self) -> MessageBuilder<'a> {
    MessageBuilder::new()
  }

  #[instrument(skip(self, message), fields(chat_id = message.chat_id))]
  pub(crate) async fn send_message(&self, message: Message<'_>) -> Result<(), Error> {
    // The URL embeds the bot token, so it is stripped from every reqwest error.
    let response = self
      .client
      .post(self.config.send_message_url())
      .json(&message)
      .send()
      .await
      .map_err(|e| Error::HttpError(e.without_url()))?;

    let status = response.status();

    if status.as_u16() == 429 {
      warn!("Telegram rate limit hit");
      return Err(Error::RateLimitExceeded);
    }

    let telegram_response: TelegramResponse = response
      .json()
      .await
      .map_err(|e| Error::HttpError(e.without_url()))?;

    if !telegram_response.ok {
      return Err(Error::ApiError(format!(
        "{}: {}",
        status, telegram_response.description
      )));
    }

    debug!("Message sent successfully");
    Ok(())
  }
}
