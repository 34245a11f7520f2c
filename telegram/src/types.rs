// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub enum ParseMode {
  Markdown,
  #[serde(rename = "HTML")]
  Html,
  MarkdownV2,
}

#[derive(Deserialize)]
pub(crate) struct TelegramResponse {
  pub ok: bool,
  #[serde(default)]
  pub description: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Message<'a> {
  pub chat_id: i64,
  pub text: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parse_mode: Option<ParseMode>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub disable_web_page_preview: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reply_to_message_id: Option<i64>,
}
