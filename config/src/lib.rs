// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod config;

pub use crate::config::{
  Config, MetarSettings, TelegramSettings, Units, WeatherSettings, TELEGRAM_CHAT_VAR,
  TELEGRAM_TOKEN_VAR, WEATHER_API_KEY_VARS,
};

pub mod defaults {
  pub const OPENWEATHER_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
  pub const METAR_BASE_URL: &str = "https://aviationweather.gov/adds/dataserver_current/httpparam";
  pub const DEFAULT_LANGUAGE: &str = "en";
  pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
  pub const DEFAULT_HOURS_BEFORE_NOW: u32 = 3;
}
