// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use clap::Subcommand;
use tracing::{instrument, warn};
use weather::{ClassifiedError, ErrorKind, RequestParameters, WeatherProvider};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
  /// Latest METAR for an ICAO station
  Metar {
    /// Station identifier, e.g. CYOW
    station: Vec<String>,
  },
  /// Current conditions for a place
  Weather {
    /// City name, optionally followed by a country code
    search: Vec<String>,
  },
}

impl Command {
  /// Free-text arguments joined with single spaces.
  pub fn arguments(&self) -> String {
    match self {
      Command::Metar { station } => station.join(" "),
      Command::Weather { search } => search.join(" "),
    }
  }
}

/// Text to send back, plus the error it came from if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
  pub text: String,
  pub error: Option<ClassifiedError>,
}

impl Reply {
  fn ok(text: String) -> Self {
    Self { text, error: None }
  }

  fn failed(text: String, error: ClassifiedError) -> Self {
    Self {
      text,
      error: Some(error),
    }
  }

  pub fn is_error(&self) -> bool {
    self.error.is_some()
  }
}

#[instrument(skip(provider))]
pub async fn execute<P>(command: &Command, provider: &P) -> Reply
where
  P: WeatherProvider + ?Sized,
{
  let arguments = command.arguments();
  let params = match command {
    Command::Metar { .. } => RequestParameters::Aviation(provider.metar_query(&arguments)),
    Command::Weather { .. } => {
      RequestParameters::WeatherLookup(provider.weather_query(&arguments))
    }
  };

  match (provider.fetch(params).await, command) {
    (Ok(report), _) => Reply::ok(report.text()),
    (Err(e), Command::Metar { .. }) if e.kind() == ErrorKind::MissingField => {
      warn!("No METAR available: {}", e);
      Reply::failed(format!("No report for {}", arguments.trim()), e)
    }
    (Err(e), _) => Reply::failed(e.message().to_string(), e),
  }
}
