// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
//! Maps every failure the pipeline can meet onto a [`ClassifiedError`].
//!
//! Messages produced here are shown to end users. They never include URLs,
//! raw payloads or the underlying library error, which is logged instead.

use crate::{text::title_case, transport::ContentFormat};
use error::ClassifiedError;
use std::fmt::Display;
use tracing::warn;

pub const NO_STATION: &str = "No station specified";
pub const NO_SEARCH_INPUT: &str = "missing search input";

pub const TIMED_OUT: &str = "The weather service did not respond in time";
pub const UNREACHABLE: &str = "Could not reach the weather service";

pub const NO_METAR_DATA: &str = "no METAR data found";
pub const NO_WEATHER_DATA: &str = "no weather data found";
pub const MISSING_WEATHER_INFO: &str = "missing weather info";
pub const EMPTY_WEATHER_ARRAY: &str = "pBody.weather Array came back empty";
pub const MISSING_DESCRIPTION: &str = "missing weather description";
pub const MISSING_TEMPERATURE: &str = "missing temperature";
pub const MISSING_WIND_DIRECTION: &str = "missing wind direction";

const AUTHORIZATION_FAILED: &str = "Authorization Failed";
const REQUEST_FAILED: &str = "Request Failed";

pub fn transport_error(err: reqwest::Error) -> ClassifiedError {
  let err = err.without_url();
  if err.is_timeout() {
    warn!("Upstream request timed out: {}", err);
    ClassifiedError::timeout(TIMED_OUT)
  } else {
    warn!("Upstream request failed: {}", err);
    ClassifiedError::transport(UNREACHABLE)
  }
}

pub fn malformed_payload(format: ContentFormat, detail: impl Display) -> ClassifiedError {
  warn!("Failed to decode {} response: {}", format, detail);
  ClassifiedError::malformed_payload(format!(
    "The weather service sent an unreadable {} response",
    format
  ))
}

/// Builds the error for a non-2xx answer.
///
/// The upstream message is title-cased and only used when it is not blank.
pub fn upstream_status(code: u16, upstream_message: Option<&str>) -> ClassifiedError {
  let upstream = upstream_message
    .map(title_case)
    .filter(|message| !message.trim().is_empty());

  let message = match (code, upstream.as_deref()) {
    (401, Some(upstream)) => format!("{AUTHORIZATION_FAILED} ({code})\nError Message: {upstream}"),
    (401, None) => format!("{AUTHORIZATION_FAILED} ({code})"),
    (404, Some(upstream)) => format!("{upstream} ({code})"),
    (_, Some(upstream)) => format!("{REQUEST_FAILED} ({code})\nError Message: {upstream}"),
    (_, None) => format!("{REQUEST_FAILED} ({code})"),
  };

  let err = ClassifiedError::upstream_status(code, message);
  match upstream {
    Some(upstream) => err.with_upstream_message(upstream),
    None => err,
  }
}
