// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.

/// Sixteen-point compass, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] = [
  "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
  "NNW",
];

const SECTOR_DEGREES: f64 = 22.5;

/// Lower-cases `input`, then upper-cases the first character of every
/// space-separated word.
///
/// Only single spaces separate words, so runs of spaces and other whitespace
/// are kept as they are.
pub fn title_case(input: &str) -> String {
  input
    .to_lowercase()
    .split(' ')
    .map(capitalize)
    .collect::<Vec<_>>()
    .join(" ")
}

// A first letter whose upper case expands to several characters (`ß`) is kept,
// otherwise a second pass would lower-case the expansion and change the word.
fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  let Some(first) = chars.next() else {
    return String::new();
  };

  let mut upper = first.to_uppercase();
  let mut out = String::with_capacity(word.len());
  match (upper.next(), upper.next()) {
    (Some(single), None) => out.push(single),
    _ => out.push(first),
  }
  out.extend(chars);
  out
}

/// Maps a wind direction in degrees to its sixteen-point compass label.
///
/// Half-sector boundaries round up, and anything outside `[0, 360)` wraps.
pub fn compass_label(degrees: f64) -> &'static str {
  let sector = (degrees / SECTOR_DEGREES + 0.5).floor() as i64;
  COMPASS_POINTS[sector.rem_euclid(COMPASS_POINTS.len() as i64) as usize]
}
