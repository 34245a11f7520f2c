// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use config::Units;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherLookupResult {
  pub condition_description: String,
  pub temperature: f64,
  pub wind_direction_degrees: f64,
  pub wind_compass_label: String,
  pub success: bool,
  pub location: Option<String>,
  pub country: Option<String>,
  pub feels_like: Option<f64>,
  pub humidity: Option<f64>,
  pub wind_speed: Option<f64>,
  pub units: Units,
}

impl WeatherLookupResult {
  pub fn format_report(&self) -> String {
    let temp_unit = self.units.temperature_symbol();

    let place = match (&self.location, &self.country) {
      (Some(location), Some(country)) => format!("{}, {}", location, country),
      (Some(location), None) => location.clone(),
      _ => "requested location".to_string(),
    };

    let mut lines = vec![format!(
      "Weather for {}: {}",
      place, self.condition_description
    )];

    let mut temperature = format!("Temperature: {:.1}{}", self.temperature, temp_unit);
    if let Some(feels_like) = self.feels_like {
      temperature.push_str(&format!(" (feels like {:.1}{})", feels_like, temp_unit));
    }
    lines.push(temperature);

    lines.push(match self.wind_speed {
      Some(speed) => format!(
        "Wind: {:.1} {} from {} ({:.0}°)",
        speed,
        self.units.speed_symbol(),
        self.wind_compass_label,
        self.wind_direction_degrees
      ),
      None => format!(
        "Wind: from {} ({:.0}°)",
        self.wind_compass_label, self.wind_direction_degrees
      ),
    });

    if let Some(humidity) = self.humidity {
      lines.push(format!("Humidity: {:.0}%", humidity));
    }

    lines.join("\n")
  }
}
