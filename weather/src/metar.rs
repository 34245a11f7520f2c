// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
//! METAR reports from the aviation weather data server (XML).

use crate::{
  classify,
  constants::metar::*,
  decode::{DecodedRecord, TEXT_KEY},
  models::WeatherReport,
  pipeline::Integration,
  transport::{ContentFormat, Request},
};
use chrono::{DateTime, Utc};
use config::{defaults::DEFAULT_HOURS_BEFORE_NOW, MetarSettings};
use error::{ClassifiedError, Error};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetarQuery {
  pub station: String,
  pub hours_before_now: u32,
  pub most_recent: bool,
}

impl MetarQuery {
  pub fn new(station: impl Into<String>) -> Self {
    Self {
      station: station.into(),
      hours_before_now: DEFAULT_HOURS_BEFORE_NOW,
      most_recent: true,
    }
  }
}

/// Fields pulled out of the first METAR element, still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetarFields {
  pub raw_text: String,
  pub station_id: Option<String>,
  pub observation_time: Option<String>,
  pub flight_category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MetarApi {
  base_url: Url,
  timeout: Duration,
  hours_before_now: u32,
  most_recent: bool,
}

impl MetarApi {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
    let base_url = Url::parse(base_url)
      .map_err(|e| Error::ConfigError(format!("Invalid METAR endpoint {}: {}", base_url, e)))?;

    Ok(Self {
      base_url,
      timeout,
      hours_before_now: DEFAULT_HOURS_BEFORE_NOW,
      most_recent: true,
    })
  }

  pub fn from_settings(settings: &MetarSettings) -> Result<Self, Error> {
    let mut api = Self::new(&settings.base_url, settings.timeout())?;
    api.hours_before_now = settings.hours_before_now;
    api.most_recent = settings.most_recent;
    Ok(api)
  }

  /// A query for `station` using this endpoint's configured look-back window.
  pub fn query(&self, station: impl Into<String>) -> MetarQuery {
    MetarQuery {
      station: station.into(),
      hours_before_now: self.hours_before_now,
      most_recent: self.most_recent,
    }
  }

  fn no_data(response: Option<&Value>, status: u16) -> ClassifiedError {
    let upstream = response.and_then(upstream_error);

    if !(200..300).contains(&status) {
      return classify::upstream_status(status, upstream);
    }

    let err = ClassifiedError::missing_field(classify::NO_METAR_DATA);
    match upstream {
      Some(upstream) => err.with_upstream_message(upstream),
      None => err,
    }
  }
}

impl Integration for MetarApi {
  type Params = MetarQuery;
  type Extracted = MetarFields;
  type Output = WeatherReport;

  fn name(&self) -> &'static str {
    "metar"
  }

  fn build(&self, query: &MetarQuery) -> Result<Request, ClassifiedError> {
    let station = query.station.trim();
    if station.is_empty() {
      return Err(ClassifiedError::invalid_input(classify::NO_STATION));
    }

    let mut url = self.base_url.clone();
    url
      .query_pairs_mut()
      .append_pair("dataSource", DATA_SOURCE)
      .append_pair("requestType", REQUEST_TYPE)
      .append_pair("format", FORMAT)
      .append_pair("stationString", station)
      .append_pair("mostRecent", if query.most_recent { "true" } else { "false" })
      .append_pair("hoursBeforeNow", &query.hours_before_now.to_string());

    Ok(Request::new(url, self.timeout, ContentFormat::Xml))
  }

  fn extract(&self, record: &DecodedRecord, status: u16) -> Result<MetarFields, ClassifiedError> {
    let response = record.get(RESPONSE_ELEMENT).filter(|value| value.is_object());

    let metar = response
      .and_then(first_metar)
      .ok_or_else(|| Self::no_data(response, status))?;

    let raw_text = child_text(metar, "raw_text").ok_or_else(|| Self::no_data(response, status))?;

    Ok(MetarFields {
      raw_text: raw_text.to_string(),
      station_id: child_text(metar, "station_id").map(|s| s.trim().to_string()),
      observation_time: child_text(metar, "observation_time").map(|s| s.trim().to_string()),
      flight_category: child_text(metar, "flight_category").map(|s| s.trim().to_string()),
    })
  }

  fn normalize(&self, fields: MetarFields) -> Result<WeatherReport, ClassifiedError> {
    let observation_time = fields.observation_time.as_deref().and_then(parse_observation_time);

    Ok(WeatherReport {
      raw_text: fields.raw_text,
      station_id: fields.station_id,
      observation_time,
      flight_category: fields.flight_category,
    })
  }
}

/// `response.data[0].METAR[0]`, provided both sequences are non-empty.
fn first_metar(response: &Value) -> Option<&Value> {
  response
    .get("data")?
    .as_array()?
    .first()?
    .get(METAR_ELEMENT)?
    .as_array()?
    .first()
}

fn upstream_error(response: &Value) -> Option<&str> {
  let errors = response.get("errors")?.as_array()?.first()?;
  child_text(errors, "error").filter(|text| !text.trim().is_empty())
}

/// Text of the first `name` child of an element.
fn child_text<'a>(element: &'a Value, name: &str) -> Option<&'a str> {
  match element.get(name)? {
    Value::Array(items) => items.first().and_then(text_of),
    other => text_of(other),
  }
}

fn text_of(value: &Value) -> Option<&str> {
  match value {
    Value::String(text) => Some(text),
    Value::Object(map) => map.get(TEXT_KEY)?.as_str(),
    _ => None,
  }
}

fn parse_observation_time(timestamp: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(timestamp)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      warn!("Failed to parse observation time '{}': {}", timestamp, e);
      e
    })
    .ok()
}
