// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use std::{fmt, time::Duration};

pub(crate) const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MAX_MESSAGE_LENGTH: usize = 4096;

#[derive(Clone)]
pub(crate) struct TelegramConfig {
  pub(crate) token: String,
  pub(crate) base_url: String,
  pub(crate) timeout: Duration,
}

impl TelegramConfig {
  pub(crate) fn send_message_url(&self) -> String {
    format!(
      "{}/bot{}/sendMessage",
      self.base_url.trim_end_matches('/'),
      self.token
    )
  }
}

impl Default for TelegramConfig {
  fn default() -> Self {
    Self {
      token: String::new(),
      base_url: TELEGRAM_API_BASE.to_string(),
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
  }
}

impl fmt::Debug for TelegramConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TelegramConfig")
      .field("token", &"<redacted>")
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .finish()
  }
}
