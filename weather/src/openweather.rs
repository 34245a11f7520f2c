// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  classify,
  decode::DecodedRecord,
  models::WeatherLookupResult,
  pipeline::Integration,
  text::{compass_label, title_case},
  transport::{ContentFormat, Request},
};
use config::{
  defaults::{DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_MS},
  Units, WeatherSettings,
};
use error::{ClassifiedError, Error};
use serde_json::Value;
use std::{fmt, time::Duration};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
  pub search: String,
  pub language: String,
  pub units: Units,
  pub timeout: Duration,
}

impl WeatherQuery {
  pub fn new(search: impl Into<String>) -> Self {
    Self {
      search: search.into(),
      language: DEFAULT_LANGUAGE.to_string(),
      units: Units::default(),
      timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
    }
  }

  pub fn language(mut self, language: impl Into<String>) -> Self {
    self.language = language.into();
    self
  }

  pub fn units(mut self, units: Units) -> Self {
    self.units = units;
    self
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }
}

/// Values read from a current-weather document before any validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedWeather {
  pub description: Option<String>,
  pub temperature: Option<f64>,
  pub wind_direction: Option<f64>,
  pub location: Option<String>,
  pub country: Option<String>,
  pub feels_like: Option<f64>,
  pub humidity: Option<f64>,
  pub wind_speed: Option<f64>,
  pub units: Units,
}

#[derive(Clone)]
pub struct OpenWeatherApi {
  base_url: Url,
  api_key: String,
  language: String,
  units: Units,
  timeout: Duration,
}

impl fmt::Debug for OpenWeatherApi {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OpenWeatherApi")
      .field("base_url", &self.base_url.as_str())
      .field("api_key", &"<redacted>")
      .field("language", &self.language)
      .field("units", &self.units)
      .field("timeout", &self.timeout)
      .finish()
  }
}

impl OpenWeatherApi {
  pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, Error> {
    let base_url = Url::parse(base_url).map_err(|e| {
      Error::ConfigError(format!("Invalid weather endpoint {}: {}", base_url, e))
    })?;

    Ok(Self {
      base_url,
      api_key: api_key.into(),
      language: DEFAULT_LANGUAGE.to_string(),
      units: Units::default(),
      timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
    })
  }

  pub fn from_settings(settings: &WeatherSettings, api_key: &str) -> Result<Self, Error> {
    let mut api = Self::new(&settings.base_url, api_key)?;
    api.language = settings.language.clone();
    api.units = settings.units;
    api.timeout = settings.timeout();
    Ok(api)
  }

  /// A query for `search` carrying this endpoint's language, units and timeout.
  pub fn query(&self, search: impl Into<String>) -> WeatherQuery {
    WeatherQuery::new(search)
      .language(self.language.clone())
      .units(self.units)
      .timeout(self.timeout)
  }
}

impl Integration for OpenWeatherApi {
  type Params = WeatherQuery;
  type Extracted = ObservedWeather;
  type Output = WeatherLookupResult;

  fn name(&self) -> &'static str {
    "openweather"
  }

  fn build(&self, query: &WeatherQuery) -> Result<Request, ClassifiedError> {
    let search = query.search.trim();
    if search.is_empty() {
      return Err(ClassifiedError::invalid_input(classify::NO_SEARCH_INPUT));
    }

    let language = match query.language.trim() {
      "" => DEFAULT_LANGUAGE,
      language => language,
    };

    let mut url = self.base_url.clone();
    url
      .query_pairs_mut()
      .append_pair("units", &query.units.to_string())
      .append_pair("lang", language)
      .append_pair("q", search)
      .append_pair("appid", &self.api_key);

    Ok(Request::new(url, query.timeout, ContentFormat::Json))
  }

  fn extract(&self, record: &DecodedRecord, status: u16) -> Result<ObservedWeather, ClassifiedError> {
    if !(200..300).contains(&status) {
      let message = record.get("message").and_then(Value::as_str);
      return Err(classify::upstream_status(status, message));
    }

    let no_data = || ClassifiedError::missing_field(classify::NO_WEATHER_DATA);

    let body = record.as_object().ok_or_else(no_data)?;
    let weather = body.get("weather").ok_or_else(no_data)?;
    let entries = weather
      .as_array()
      .ok_or_else(|| ClassifiedError::missing_field(classify::MISSING_WEATHER_INFO))?;
    let condition = entries
      .first()
      .filter(|entry| entry.is_object())
      .ok_or_else(|| ClassifiedError::missing_field(classify::EMPTY_WEATHER_ARRAY))?;
    let main = body.get("main").ok_or_else(no_data)?;

    let wind = body.get("wind");
    Ok(ObservedWeather {
      description: condition
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string),
      temperature: main.get("temp").and_then(Value::as_f64),
      wind_direction: wind.and_then(|w| w.get("deg")).and_then(Value::as_f64),
      location: body
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string),
      country: body
        .get("sys")
        .and_then(|sys| sys.get("country"))
        .and_then(Value::as_str)
        .map(str::to_string),
      feels_like: main.get("feels_like").and_then(Value::as_f64),
      humidity: main.get("humidity").and_then(Value::as_f64),
      wind_speed: wind.and_then(|w| w.get("speed")).and_then(Value::as_f64),
      units: self.units,
    })
  }

  fn normalize(&self, observed: ObservedWeather) -> Result<WeatherLookupResult, ClassifiedError> {
    let description = observed
      .description
      .filter(|d| !d.trim().is_empty())
      .ok_or_else(|| ClassifiedError::missing_field(classify::MISSING_DESCRIPTION))?;
    let temperature = observed
      .temperature
      .ok_or_else(|| ClassifiedError::missing_field(classify::MISSING_TEMPERATURE))?;
    let wind_direction = observed
      .wind_direction
      .ok_or_else(|| ClassifiedError::missing_field(classify::MISSING_WIND_DIRECTION))?;

    Ok(WeatherLookupResult {
      condition_description: title_case(&description),
      temperature,
      wind_direction_degrees: wind_direction,
      wind_compass_label: compass_label(wind_direction).to_string(),
      success: true,
      location: observed.location,
      country: observed.country,
      feels_like: observed.feels_like,
      humidity: observed.humidity,
      wind_speed: observed.wind_speed,
      units: observed.units,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{decode::decode, pipeline::tests::StubTransport, pipeline::Pipeline};
  use config::defaults::OPENWEATHER_BASE_URL;
  use error::ErrorKind;
  use serde_json::json;

  fn api() -> OpenWeatherApi {
    OpenWeatherApi::new(OPENWEATHER_BASE_URL, "secret-key").unwrap()
  }

  fn ottawa() -> Value {
    json!({
      "coord": {"lon": -75.6981, "lat": 45.4112},
      "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
      "base": "stations",
      "main": {"temp": 12.34, "feels_like": 11.0, "pressure": 1012, "humidity": 81},
      "wind": {"speed": 5.14, "deg": 230},
      "sys": {"country": "CA"},
      "name": "Ottawa",
      "cod": 200
    })
  }

  fn extract(record: Value, status: u16) -> Result<ObservedWeather, ClassifiedError> {
    api().extract(&record, status)
  }

  fn run_stages(record: Value) -> Result<WeatherLookupResult, ClassifiedError> {
    let api = api();
    let observed = api.extract(&record, 200)?;
    api.normalize(observed)
  }

  #[test]
  fn builds_the_query_string_in_order() {
    let request = api().build(&WeatherQuery::new("Ottawa")).unwrap();
    assert_eq!(
      request.url.as_str(),
      "http://api.openweathermap.org/data/2.5/weather?units=metric&lang=en&q=Ottawa&appid=secret-key"
    );
    assert_eq!(request.format, ContentFormat::Json);
  }

  #[test]
  fn search_is_trimmed_and_encoded() {
    let query = WeatherQuery::new("  São Paulo, BR ").units(Units::Imperial).language("pt_br");
    let request = api().build(&query).unwrap();
    let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
    assert_eq!(
      pairs,
      vec![
        ("units".to_string(), "imperial".to_string()),
        ("lang".to_string(), "pt_br".to_string()),
        ("q".to_string(), "São Paulo, BR".to_string()),
        ("appid".to_string(), "secret-key".to_string()),
      ]
    );
  }

  #[test]
  fn blank_search_is_rejected() {
    let err = api().build(&WeatherQuery::new("   ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.message(), "missing search input");
  }

  #[test]
  fn blank_language_falls_back_to_default() {
    let request = api().build(&WeatherQuery::new("Oslo").language(" ")).unwrap();
    assert!(request.url.as_str().contains("lang=en"));
  }

  #[test]
  fn query_inherits_endpoint_settings() {
    let settings = WeatherSettings {
      language: "de".into(),
      units: Units::Standard,
      timeout_ms: 1500,
      ..WeatherSettings::default()
    };
    let api = OpenWeatherApi::from_settings(&settings, "k").unwrap();
    let query = api.query("Berlin");
    assert_eq!(query.language, "de");
    assert_eq!(query.units, Units::Standard);
    assert_eq!(query.timeout, Duration::from_millis(1500));
  }

  #[test]
  fn debug_output_hides_the_key() {
    let rendered = format!("{:?}", api());
    assert!(!rendered.contains("secret-key"));
  }

  #[test]
  fn full_document_normalizes() {
    let result = run_stages(ottawa()).unwrap();
    assert!(result.success);
    assert_eq!(result.condition_description, "Light Rain");
    assert_eq!(result.temperature, 12.34);
    assert_eq!(result.wind_direction_degrees, 230.0);
    assert_eq!(result.wind_compass_label, "SW");
    assert_eq!(result.location.as_deref(), Some("Ottawa"));
    assert_eq!(result.country.as_deref(), Some("CA"));
    assert_eq!(result.humidity, Some(81.0));
  }

  #[test]
  fn unauthorized_uses_title_cased_message() {
    let err = extract(json!({"cod": 401, "message": "invalid api key"}), 401).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamStatus(401));
    assert_eq!(
      err.message(),
      "Authorization Failed (401)\nError Message: Invalid Api Key"
    );
  }

  #[test]
  fn not_found_with_empty_message() {
    let err = extract(json!({"cod": "404", "message": ""}), 404).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamStatus(404));
    assert_eq!(err.message(), "Request Failed (404)");
  }

  #[test]
  fn not_found_with_message() {
    let err = extract(json!({"cod": "404", "message": "city not found"}), 404).unwrap_err();
    assert_eq!(err.message(), "City Not Found (404)");
  }

  #[test]
  fn status_wins_over_a_valid_looking_body() {
    let err = extract(ottawa(), 500).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamStatus(500));
    assert_eq!(err.message(), "Request Failed (500)");
  }

  #[test]
  fn non_mapping_body_has_no_data() {
    for record in [json!([1, 2]), json!("text"), json!(null)] {
      let err = extract(record, 200).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::MissingField);
      assert_eq!(err.message(), "no weather data found");
    }
  }

  #[test]
  fn weather_section_checks() {
    let mut record = ottawa();
    record.as_object_mut().unwrap().remove("weather");
    assert_eq!(extract(record, 200).unwrap_err().message(), "no weather data found");

    let mut record = ottawa();
    record["weather"] = json!({"description": "rain"});
    assert_eq!(extract(record, 200).unwrap_err().message(), "missing weather info");

    let mut record = ottawa();
    record["weather"] = json!([]);
    assert_eq!(
      extract(record, 200).unwrap_err().message(),
      "pBody.weather Array came back empty"
    );

    let mut record = ottawa();
    record["weather"] = json!(["rain"]);
    assert_eq!(
      extract(record, 200).unwrap_err().message(),
      "pBody.weather Array came back empty"
    );
  }

  #[test]
  fn missing_main_has_no_data() {
    let mut record = ottawa();
    record.as_object_mut().unwrap().remove("main");
    let err = extract(record, 200).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert_eq!(err.message(), "no weather data found");
  }

  #[test]
  fn missing_values_fail_normalization() {
    let mut record = ottawa();
    record["weather"][0].as_object_mut().unwrap().remove("description");
    assert_eq!(run_stages(record).unwrap_err().message(), "missing weather description");

    let mut record = ottawa();
    record["main"].as_object_mut().unwrap().remove("temp");
    assert_eq!(run_stages(record).unwrap_err().message(), "missing temperature");

    let mut record = ottawa();
    record.as_object_mut().unwrap().remove("wind");
    assert_eq!(run_stages(record).unwrap_err().message(), "missing wind direction");

    let mut record = ottawa();
    record["main"]["temp"] = json!("warm");
    assert_eq!(run_stages(record).unwrap_err().kind(), ErrorKind::MissingField);
  }

  #[tokio::test]
  async fn pipeline_returns_lookup_result() {
    let pipeline = Pipeline::new(StubTransport::new(200, ottawa().to_string()));
    let result = pipeline.run(&api(), &api().query("Ottawa")).await.unwrap();
    assert_eq!(result.wind_compass_label, "SW");
    assert_eq!(pipeline.transport().calls(), 1);
  }

  #[tokio::test]
  async fn pipeline_reports_non_json_error_page() {
    let pipeline = Pipeline::new(StubTransport::new(500, "<html>Internal Server Error</html>"));
    let err = pipeline.run(&api(), &api().query("Ottawa")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedPayload);
  }

  #[test]
  fn decoded_body_feeds_extract() {
    let record = decode(&ottawa().to_string(), ContentFormat::Json).unwrap();
    assert!(api().extract(&record, 200).is_ok());
  }
}
