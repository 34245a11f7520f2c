// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use std::fmt;
use thiserror::Error as ThisError;

/// Failure categories a weather request can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// The caller gave no usable argument; nothing was sent.
  InvalidInput,
  /// Network-level failure, no status code available.
  Transport,
  /// The upstream did not answer within the request timeout.
  Timeout,
  /// The upstream answered with a non-2xx status.
  UpstreamStatus(u16),
  /// The body could not be decoded in its expected format.
  MalformedPayload,
  /// The body decoded but a required field is absent or has the wrong shape.
  MissingField,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorKind::InvalidInput => write!(f, "invalid_input"),
      ErrorKind::Transport => write!(f, "transport"),
      ErrorKind::Timeout => write!(f, "timeout"),
      ErrorKind::UpstreamStatus(code) => write!(f, "upstream_status({})", code),
      ErrorKind::MalformedPayload => write!(f, "malformed_payload"),
      ErrorKind::MissingField => write!(f, "missing_field"),
    }
  }
}

/// The only failure representation that leaves the weather pipeline.
///
/// `Display` yields `message`, which is safe to show to an end user.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClassifiedError {
  kind: ErrorKind,
  message: String,
  upstream_message: Option<String>,
}

impl ClassifiedError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
      upstream_message: None,
    }
  }

  pub fn invalid_input(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::InvalidInput, message)
  }

  pub fn transport(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Transport, message)
  }

  pub fn timeout(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Timeout, message)
  }

  pub fn upstream_status(code: u16, message: impl Into<String>) -> Self {
    Self::new(ErrorKind::UpstreamStatus(code), message)
  }

  pub fn malformed_payload(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::MalformedPayload, message)
  }

  pub fn missing_field(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::MissingField, message)
  }

  pub fn with_upstream_message(mut self, upstream_message: impl Into<String>) -> Self {
    self.upstream_message = Some(upstream_message.into());
    self
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn upstream_message(&self) -> Option<&str> {
    self.upstream_message.as_deref()
  }

  pub fn status_code(&self) -> Option<u16> {
    match self.kind {
      ErrorKind::UpstreamStatus(code) => Some(code),
      _ => None,
    }
  }
}

#[derive(ThisError, Debug)]
pub enum Error {
  #[error("API error: {0}")]
  ApiError(String),
  #[error("Configuration error: {0}")]
  ConfigError(String),
  #[error("IO error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("HTTP error: {0}")]
  HttpError(#[from] reqwest::Error),
  #[error("Failed to parse configuration: {0}")]
  ParseError(#[from] toml::de::Error),
  #[error("Rate limit exceeded")]
  RateLimitExceeded,
  #[error(transparent)]
  Classified(#[from] ClassifiedError),
}
