// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod classify;
pub mod decode;
pub mod metar;
pub mod models;
pub mod openweather;
pub mod pipeline;
pub mod service;
pub mod text;
pub mod transport;

pub use error::{ClassifiedError, ErrorKind};
pub use metar::{MetarApi, MetarQuery};
pub use models::{WeatherLookupResult, WeatherReport};
pub use openweather::{OpenWeatherApi, WeatherQuery};
pub use pipeline::{Integration, Pipeline};
pub use service::{Report, RequestParameters, WeatherClient, WeatherProvider};
pub use transport::{ContentFormat, RawResponse, ReqwestTransport, Request, Transport};

pub mod constants {
  pub(crate) const USER_AGENT: &str = concat!("wxbot/", env!("CARGO_PKG_VERSION"));

  pub(crate) mod metar {
    pub const DATA_SOURCE: &str = "metars";
    pub const REQUEST_TYPE: &str = "retrieve";
    pub const FORMAT: &str = "xml";
    pub const RESPONSE_ELEMENT: &str = "response";
    pub const METAR_ELEMENT: &str = "METAR";
  }
}
