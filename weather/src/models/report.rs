// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single METAR observation. Only `raw_text` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
  pub raw_text: String,
  pub station_id: Option<String>,
  pub observation_time: Option<DateTime<Utc>>,
  pub flight_category: Option<String>,
}
