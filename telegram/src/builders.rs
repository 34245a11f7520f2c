// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  client::TelegramClient,
  config::{TelegramConfig, MAX_MESSAGE_LENGTH},
  types::{Message, ParseMode},
};
use error::Error;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MessageBuilder<'a> {
  pub(crate) chat_id: Option<i64>,
  pub(crate) text: Option<&'a str>,
  pub(crate) parse_mode: Option<ParseMode>,
  pub(crate) disable_preview: Option<bool>,
  pub(crate) reply_to: Option<i64>,
}

impl<'a> MessageBuilder<'a> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn chat_id(mut self, id: i64) -> Self {
    self.chat_id = Some(id);
    self
  }

  pub fn text(mut self, text: &'a str) -> Self {
    self.text = Some(text);
    self
  }

  pub fn parse_mode(mut self, mode: ParseMode) -> Self {
    self.parse_mode = Some(mode);
    self
  }

  pub fn disable_preview(mut self) -> Self {
    self.disable_preview = Some(true);
    self
  }

  pub fn reply_to(mut self, message_id: i64) -> Self {
    self.reply_to = Some(message_id);
    self
  }

  pub(crate) fn into_message(self) -> Result<Message<'a>, Error> {
    let chat_id = self
      .chat_id
      .ok_or_else(|| Error::ApiError("Chat ID is required".into()))?;

    let text = self
      .text
      .filter(|text| !text.is_empty())
      .ok_or_else(|| Error::ApiError("Message text is required".into()))?;

    if text.len() > MAX_MESSAGE_LENGTH {
      return Err(Error::ApiError(format!(
        "Message too long: {} bytes (max {})",
        text.len(),
        MAX_MESSAGE_LENGTH
      )));
    }

    Ok(Message {
      chat_id,
      text,
      parse_mode: self.parse_mode,
      disable_web_page_preview: self.disable_preview,
      reply_to_message_id: self.reply_to,
    })
  }

  pub async fn send(self, client: &TelegramClient) -> Result<(), Error> {
    client.send_message(self.into_message()?).await
  }
}

#[derive(Debug, Default)]
pub struct TelegramClientBuilder {
  pub(crate) config: TelegramConfig,
}

impl TelegramClientBuilder {
  pub fn token(mut self, token: impl Into<String>) -> Self {
    self.config.token = token.into();
    self
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.config.timeout = timeout;
    self
  }

  pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
    self.config.base_url = base_url.into();
    self
  }

  pub fn build(self) -> Result<TelegramClient, Error> {
    if self.config.token.trim().is_empty() {
      return Err(Error::ConfigError("Bot token cannot be empty".into()));
    }

    let client = reqwest::Client::builder()
      .timeout(self.config.timeout)
      .build()
      .map_err(Error::HttpError)?;

    Ok(TelegramClient {
      config: self.config,
      client,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn message_requires_chat_and_text() {
    let err = MessageBuilder::new().text("hi").into_message().unwrap_err();
    assert!(matches!(err, Error::ApiError(_)));

    let err = MessageBuilder::new().chat_id(1).into_message().unwrap_err();
    assert!(matches!(err, Error::ApiError(_)));

    let err = MessageBuilder::new().chat_id(1).text("").into_message().unwrap_err();
    assert!(matches!(err, Error::ApiError(_)));
  }

  #[test]
  fn message_length_is_counted_in_bytes() {
    let fits = "a".repeat(MAX_MESSAGE_LENGTH);
    assert!(MessageBuilder::new().chat_id(1).text(&fits).into_message().is_ok());

    // 2049 two-byte characters
    let too_long = "я".repeat(MAX_MESSAGE_LENGTH / 2 + 1);
    let err = MessageBuilder::new().chat_id(1).text(&too_long).into_message().unwrap_err();
    assert!(matches!(err, Error::ApiError(_)));
  }

  #[test]
  fn message_serializes_only_set_options() {
    let message = MessageBuilder::new()
      .chat_id(-100)
      .text("CYOW 220100Z")
      .parse_mode(ParseMode::Html)
      .into_message()
      .unwrap();

    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(
      json,
      serde_json::json!({"chat_id": -100, "text": "CYOW 220100Z", "parse_mode": "HTML"})
    );
  }

  #[test]
  fn empty_token_is_rejected() {
    let err = TelegramClientBuilder::default().token("  ").build().unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
  }

  #[test]
  fn config_debug_hides_token() {
    let builder = TelegramClientBuilder::default().token("123:secret");
    assert!(!format!("{:?}", builder).contains("secret"));
  }
}
