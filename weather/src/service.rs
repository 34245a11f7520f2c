// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  metar::{MetarApi, MetarQuery},
  models::{WeatherLookupResult, WeatherReport},
  openweather::{OpenWeatherApi, WeatherQuery},
  pipeline::Pipeline,
  transport::{ReqwestTransport, Transport},
};
use async_trait::async_trait;
use config::Config;
use error::{ClassifiedError, Error};
use tracing::{info, instrument, warn};

/// Which upstream to ask, and with what.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestParameters {
  Aviation(MetarQuery),
  WeatherLookup(WeatherQuery),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
  Metar(WeatherReport),
  Weather(WeatherLookupResult),
}

impl Report {
  /// Text ready to hand to a user.
  pub fn text(&self) -> String {
    match self {
      Report::Metar(report) => report.raw_text.clone(),
      Report::Weather(result) => result.format_report(),
    }
  }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
  async fn fetch(&self, params: RequestParameters) -> Result<Report, ClassifiedError>;

  fn metar_query(&self, station: &str) -> MetarQuery {
    MetarQuery::new(station)
  }

  fn weather_query(&self, search: &str) -> WeatherQuery {
    WeatherQuery::new(search)
  }
}

pub struct WeatherClient<T = ReqwestTransport> {
  pipeline: Pipeline<T>,
  metar: MetarApi,
  lookup: OpenWeatherApi,
}

impl WeatherClient<ReqwestTransport> {
  pub fn from_config(config: &Config) -> Result<Self, Error> {
    Self::with_transport(ReqwestTransport::new()?, config)
  }
}

impl<T: Transport> WeatherClient<T> {
  pub fn with_transport(transport: T, config: &Config) -> Result<Self, Error> {
    let metar = MetarApi::from_settings(&config.metar)?;
    let lookup = OpenWeatherApi::from_settings(&config.weather, config.weather_api_key()?)?;

    Ok(Self {
      pipeline: Pipeline::new(transport),
      metar,
      lookup,
    })
  }

  pub fn metar_api(&self) -> &MetarApi {
    &self.metar
  }

  pub fn lookup_api(&self) -> &OpenWeatherApi {
    &self.lookup
  }

  pub fn transport(&self) -> &T {
    self.pipeline.transport()
  }

  pub async fn metar(&self, station: &str) -> Result<WeatherReport, ClassifiedError> {
    self.pipeline.run(&self.metar, &self.metar.query(station)).await
  }

  pub async fn weather(&self, search: &str) -> Result<WeatherLookupResult, ClassifiedError> {
    self.pipeline.run(&self.lookup, &self.lookup.query(search)).await
  }
}

#[async_trait]
impl<T: Transport> WeatherProvider for WeatherClient<T> {
  #[instrument(skip(self))]
  async fn fetch(&self, params: RequestParameters) -> Result<Report, ClassifiedError> {
    let result = match &params {
      RequestParameters::Aviation(query) => {
        self.pipeline.run(&self.metar, query).await.map(Report::Metar)
      }
      RequestParameters::WeatherLookup(query) => {
        self.pipeline.run(&self.lookup, query).await.map(Report::Weather)
      }
    };

    match &result {
      Ok(_) => info!("Weather request completed"),
      Err(e) => warn!(kind = %e.kind(), "Weather request failed: {}", e),
    }
    result
  }

  fn metar_query(&self, station: &str) -> MetarQuery {
    self.metar.query(station)
  }

  fn weather_query(&self, search: &str) -> WeatherQuery {
    self.lookup.query(search)
  }
}
