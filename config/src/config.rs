// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::defaults::*;
use error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

pub const WEATHER_API_KEY_VARS: [&str; 2] = ["OPENWEATHER_API_KEY", "WEATHER_API_KEY"];
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_CHAT_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub weather: WeatherSettings,
  pub metar: MetarSettings,
  pub telegram: TelegramSettings,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
  pub api_key: Option<String>,
  pub base_url: String,
  pub language: String,
  pub units: Units,
  pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetarSettings {
  pub base_url: String,
  pub hours_before_now: u32,
  pub most_recent: bool,
  pub timeout_ms: u64,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
  pub bot_token: Option<String>,
  pub chat_id: Option<i64>,
  pub base_url: Option<String>,
  pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
  #[default]
  Metric,
  Imperial,
  Standard,
}

impl Config {
  #[instrument(skip(path))]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
    let content = fs::read_to_string(path)?;
    let config = Self::from_toml_str(&content)?;
    debug!("Loaded configuration successfully");
    Ok(config)
  }

  pub fn from_toml_str(content: &str) -> Result<Self, Error> {
    Ok(toml::from_str(content)?)
  }

  /// Reads `path` when it exists, applies environment overrides and validates.
  ///
  /// A missing file is not an error: everything can come from the environment.
  #[instrument(skip(path))]
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
    let path = path.as_ref();
    let mut config = if path.exists() {
      Self::from_file(path)?
    } else {
      debug!("No config file at {}, using defaults", path.display());
      Self::default()
    };

    config.apply_env_with(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
  }

  pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), Error>
  where
    F: Fn(&str) -> Option<String>,
  {
    let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(api_key) = WEATHER_API_KEY_VARS.iter().find_map(|key| present(*key)) {
      self.weather.api_key = Some(api_key);
    }

    if let Some(token) = present(TELEGRAM_TOKEN_VAR) {
      self.telegram.bot_token = Some(token);
    }

    if let Some(chat_id) = present(TELEGRAM_CHAT_VAR) {
      let chat_id = chat_id.trim().parse().map_err(|_| {
        Error::ConfigError(format!("{} must be an integer chat id", TELEGRAM_CHAT_VAR))
      })?;
      self.telegram.chat_id = Some(chat_id);
    }

    Ok(())
  }

  pub fn validate(&self) -> Result<(), Error> {
    self.weather_api_key()?;

    if self.weather.timeout_ms == 0 || self.metar.timeout_ms == 0 {
      return Err(Error::ConfigError("Request timeouts must be positive".into()));
    }

    Ok(())
  }

  pub fn weather_api_key(&self) -> Result<&str, Error> {
    self
      .weather
      .api_key
      .as_deref()
      .map(str::trim)
      .filter(|key| !key.is_empty())
      .ok_or_else(|| {
        Error::ConfigError(format!(
          "Missing weather API key (set weather.api_key or {})",
          WEATHER_API_KEY_VARS[0]
        ))
      })
  }
}

impl WeatherSettings {
  pub fn timeout(&self) -> Duration {
    Duration::from_millis(self.timeout_ms)
  }
}

impl Default for WeatherSettings {
  fn default() -> Self {
    Self {
      api_key: None,
      base_url: OPENWEATHER_BASE_URL.to_string(),
      language: DEFAULT_LANGUAGE.to_string(),
      units: Units::default(),
      timeout_ms: DEFAULT_TIMEOUT_MS,
    }
  }
}

impl fmt::Debug for WeatherSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeatherSettings")
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("base_url", &self.base_url)
      .field("language", &self.language)
      .field("units", &self.units)
      .field("timeout_ms", &self.timeout_ms)
      .finish()
  }
}

impl MetarSettings {
  pub fn timeout(&self) -> Duration {
    Duration::from_millis(self.timeout_ms)
  }
}

impl Default for MetarSettings {
  fn default() -> Self {
    Self {
      base_url: METAR_BASE_URL.to_string(),
      hours_before_now: DEFAULT_HOURS_BEFORE_NOW,
      most_recent: true,
      timeout_ms: DEFAULT_TIMEOUT_MS,
    }
  }
}

impl fmt::Debug for TelegramSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TelegramSettings")
      .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
      .field("chat_id", &self.chat_id)
      .field("base_url", &self.base_url)
      .field("timeout_ms", &self.timeout_ms)
      .finish()
  }
}

impl Units {
  pub fn temperature_symbol(&self) -> &'static str {
    match self {
      Units::Metric => "°C",
      Units::Imperial => "°F",
      Units::Standard => "K",
    }
  }

  pub fn speed_symbol(&self) -> &'static str {
    match self {
      Units::Imperial => "mph",
      Units::Metric | Units::Standard => "m/s",
    }
  }
}

impl fmt::Display for Units {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let units = match self {
      Units::Metric => "metric",
      Units::Imperial => "imperial",
      Units::Standard => "standard",
    };
    write!(f, "{}", units)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect()
  }

  #[test]
  fn empty_document_yields_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.weather.language, "en");
    assert_eq!(config.weather.units, Units::Metric);
    assert_eq!(config.weather.timeout(), Duration::from_secs(10));
    assert_eq!(config.metar.hours_before_now, 3);
    assert!(config.metar.most_recent);
    assert_eq!(config.metar.base_url, METAR_BASE_URL);
    assert!(config.telegram.bot_token.is_none());
  }

  #[test]
  fn sections_override_defaults() {
    let config = Config::from_toml_str(
      r#"
        [weather]
        api_key = "abc"
        units = "imperial"
        language = "fr"
        timeout_ms = 2500

        [metar]
        timeout_ms = 4000

        [telegram]
        chat_id = -1001
      "#,
    )
    .unwrap();

    assert_eq!(config.weather_api_key().unwrap(), "abc");
    assert_eq!(config.weather.units, Units::Imperial);
    assert_eq!(config.weather.language, "fr");
    assert_eq!(config.weather.timeout(), Duration::from_millis(2500));
    assert_eq!(config.metar.timeout(), Duration::from_secs(4));
    assert_eq!(config.telegram.chat_id, Some(-1001));
  }

  #[test]
  fn unknown_units_are_rejected() {
    let result = Config::from_toml_str("[weather]\nunits = \"kelvin\"");
    assert!(matches!(result, Err(Error::ParseError(_))));
  }

  #[test]
  fn environment_overrides_file_values() {
    let mut config = Config::from_toml_str("[weather]\napi_key = \"from-file\"").unwrap();
    let vars = env(&[
      ("OPENWEATHER_API_KEY", "from-env"),
      ("TELEGRAM_BOT_TOKEN", "123:abc"),
      ("TELEGRAM_CHAT_ID", "42"),
    ]);

    config.apply_env_with(|key| vars.get(key).cloned()).unwrap();

    assert_eq!(config.weather_api_key().unwrap(), "from-env");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
    assert_eq!(config.telegram.chat_id, Some(42));
  }

  #[test]
  fn legacy_api_key_variable_is_honoured() {
    let mut config = Config::default();
    let vars = env(&[("WEATHER_API_KEY", "legacy")]);
    config.apply_env_with(|key| vars.get(key).cloned()).unwrap();
    assert_eq!(config.weather_api_key().unwrap(), "legacy");
  }

  #[test]
  fn bad_chat_id_is_a_config_error() {
    let mut config = Config::default();
    let vars = env(&[("TELEGRAM_CHAT_ID", "general")]);
    let result = config.apply_env_with(|key| vars.get(key).cloned());
    assert!(matches!(result, Err(Error::ConfigError(_))));
  }

  #[test]
  fn missing_api_key_fails_validation() {
    let config = Config::default();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

    let config = Config::from_toml_str("[weather]\napi_key = \"   \"").unwrap();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
  }

  #[test]
  fn zero_timeout_fails_validation() {
    let config = Config::from_toml_str("[weather]\napi_key = \"k\"\n[metar]\ntimeout_ms = 0").unwrap();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
  }

  #[test]
  fn debug_output_hides_secrets() {
    let mut config = Config::default();
    config.weather.api_key = Some("super-secret".into());
    config.telegram.bot_token = Some("123:token".into());

    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("123:token"));
    assert!(rendered.contains("<redacted>"));
  }

  #[test]
  fn units_display_and_symbols() {
    assert_eq!(Units::Metric.to_string(), "metric");
    assert_eq!(Units::Standard.to_string(), "standard");
    assert_eq!(Units::Imperial.temperature_symbol(), "°F");
    assert_eq!(Units::Imperial.speed_symbol(), "mph");
    assert_eq!(Units::Standard.temperature_symbol(), "K");
  }
}
